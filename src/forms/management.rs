//! Forms of the staff management page.

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::profile::{NewProfile, hash_password};
use crate::domain::types::{ProfileEmail, ProfileId, ProfileName, Role};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Registers a new staff member.
pub struct NewUserForm {
    #[validate(length(min = 1, message = "Nome completo é obrigatório"))]
    pub name: String,
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

pub struct NewUserPayload {
    pub name: ProfileName,
    pub email: ProfileEmail,
    /// PHC string; the plain password never leaves the form.
    pub password_hash: String,
    pub role: Role,
}

impl TryFrom<NewUserForm> for NewUserPayload {
    type Error = FormError;

    fn try_from(form: NewUserForm) -> Result<Self, Self::Error> {
        let form = NewUserForm {
            email: form.email.trim().to_string(),
            ..form
        };
        form.validate()?;

        let role = match form.role.as_deref().map(str::trim) {
            None | Some("") => Role::Collaborator,
            Some(role) => role.parse().map_err(|_| FormError::InvalidRole)?,
        };

        Ok(Self {
            name: ProfileName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: ProfileEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password_hash: hash_password(&form.password)
                .map_err(|err| FormError::PasswordHash(err.to_string()))?,
            role,
        })
    }
}

impl NewUserPayload {
    pub fn into_domain(self, created_at: NaiveDateTime) -> NewProfile {
        NewProfile {
            id: ProfileId::new(),
            name: self.name,
            email: self.email,
            role: self.role,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
/// Changes the role of an existing staff member.
pub struct RoleForm {
    pub profile_id: String,
    pub role: String,
}

pub struct RolePayload {
    pub profile_id: ProfileId,
    pub role: Role,
}

impl TryFrom<RoleForm> for RolePayload {
    type Error = FormError;

    fn try_from(form: RoleForm) -> Result<Self, Self::Error> {
        Ok(Self {
            profile_id: form
                .profile_id
                .parse()
                .map_err(|_| FormError::InvalidProfileId)?,
            role: form.role.parse().map_err(|_| FormError::InvalidRole)?,
        })
    }
}
