use serde::Deserialize;
use validator::Validate;

use crate::domain::types::ProfileEmail;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Sign-in form of the login page.
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Credentials ready to be checked.
pub struct LoginPayload {
    pub email: ProfileEmail,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let email = ProfileEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        Ok(Self {
            email,
            password: form.password,
        })
    }
}
