//! Staff management, reserved to administrators.

use chrono::NaiveDateTime;

use crate::domain::profile::{Profile, hash_password};
use crate::domain::types::Role;
use crate::domain::types::{ProfileEmail, ProfileName};
use crate::dto::management::ManagementPageData;
use crate::forms::FormError;
use crate::forms::management::{NewUserForm, NewUserPayload, RoleForm, RolePayload};
use crate::models::config::BootstrapAdmin;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::{Constraint, RepositoryError};
use crate::repository::{ProfileReader, ProfileWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn list_profiles<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ManagementPageData>
where
    R: ProfileReader + ?Sized,
{
    ensure_role(repo, user, Role::Administrator)?;

    let profiles = repo.list_profiles().map_err(|err| {
        log::error!("Failed to list profiles: {err}");
        err
    })?;

    Ok(ManagementPageData {
        profiles,
        roles: vec![Role::Collaborator, Role::Administrator],
    })
}

fn form_message(err: FormError) -> ServiceError {
    match err {
        FormError::Validation(errors) => {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errors| errors.iter())
                .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Dados inválidos".to_string());
            ServiceError::Form(message)
        }
        FormError::InvalidEmail => ServiceError::Form("E-mail inválido".to_string()),
        FormError::InvalidName => ServiceError::Form("Nome inválido".to_string()),
        FormError::InvalidRole => ServiceError::Form("Papel desconhecido".to_string()),
        FormError::InvalidProfileId => ServiceError::NotFound,
        FormError::PasswordHash(message) => {
            log::error!("Failed to hash password: {message}");
            ServiceError::Internal(message)
        }
    }
}

/// Registers a new staff member able to sign in straight away.
pub fn create_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: NewUserForm,
    now: NaiveDateTime,
) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    ensure_role(repo, user, Role::Administrator)?;

    let new_profile = NewUserPayload::try_from(form)
        .map_err(form_message)?
        .into_domain(now);

    let profile = repo.create_profile(&new_profile).map_err(|err| match err {
        RepositoryError::Constraint(Constraint::ProfileEmailUnique) => {
            ServiceError::Form("Este e-mail já está cadastrado".to_string())
        }
        other => {
            log::error!("Failed to create profile: {other}");
            ServiceError::from(other)
        }
    })?;

    log::info!("{} registered {}", user.email, profile.email);
    Ok(profile)
}

/// Creates `admin` when no profile exists yet. Returns whether it did.
pub fn ensure_bootstrap_admin<R>(
    repo: &R,
    admin: &BootstrapAdmin,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    if !repo.list_profiles()?.is_empty() {
        return Ok(false);
    }

    let payload = NewUserPayload {
        name: ProfileName::new(admin.name.as_str())?,
        email: ProfileEmail::new(admin.email.as_str())?,
        password_hash: hash_password(&admin.password)
            .map_err(|err| ServiceError::Internal(err.to_string()))?,
        role: Role::Administrator,
    };
    let profile = repo.create_profile(&payload.into_domain(now))?;

    log::info!("Created bootstrap administrator {}", profile.email);
    Ok(true)
}

pub fn change_role<R>(repo: &R, user: &AuthenticatedUser, form: RoleForm) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    ensure_role(repo, user, Role::Administrator)?;

    let payload = RolePayload::try_from(form).map_err(form_message)?;

    let profile = repo
        .update_profile_role(payload.profile_id, payload.role)
        .map_err(|err| {
            log::error!("Failed to change role: {err}");
            err
        })?;

    log::info!("{} set {} as {}", user.email, profile.email, profile.role);
    Ok(profile)
}
