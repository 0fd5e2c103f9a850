use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use uuid::Uuid;

use crate::domain::types::{ProfileEmail, ProfileId, ProfileName, Role};

/// Staff member allowed to sign in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: ProfileName,
    pub email: ProfileEmail,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}

/// Staff member to be registered together with their password hash.
#[derive(Clone, Debug)]
pub struct NewProfile {
    pub id: ProfileId,
    pub name: ProfileName,
    pub email: ProfileEmail,
    pub role: Role,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Hashes `password` with Argon2id and a fresh random salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a value produced by [`hash_password`]. Anything
/// that is not a PHC string fails.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
