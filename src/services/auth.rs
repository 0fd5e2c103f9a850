//! Sign-in.

use crate::domain::profile::Profile;
use crate::forms::auth::{LoginForm, LoginPayload};
use crate::repository::ProfileReader;
use crate::services::{ServiceError, ServiceResult};

/// Returns the profile whose credentials match the form.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<Profile>
where
    R: ProfileReader + ?Sized,
{
    let payload = LoginPayload::try_from(form).map_err(|_| ServiceError::InvalidCredentials)?;

    let profile = repo
        .verify_credentials(&payload.email, &payload.password)
        .map_err(|err| {
            log::error!("Failed to verify credentials: {err}");
            err
        })?
        .ok_or(ServiceError::InvalidCredentials)?;

    log::info!("{} signed in", profile.email);
    Ok(profile)
}
