//! Signed-in staff member extracted from the identity cookie.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::profile::Profile;
use crate::domain::types::{ProfileId, Role};
use crate::models::config::ServerConfig;

/// Claims stored in the identity cookie after a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Profile id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Builds claims for `profile` valid for `hours`.
    pub fn from_profile(profile: &Profile, hours: i64) -> Self {
        let expires_at = Utc::now() + Duration::hours(hours);
        Self {
            sub: profile.id.to_string(),
            email: profile.email.as_str().to_string(),
            name: profile.name.as_str().to_string(),
            role: profile.role,
            exp: expires_at.timestamp().max(0) as usize,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    pub fn profile_id(&self) -> Option<ProfileId> {
        self.sub.parse().ok()
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("server config missing"))?;

    let identity = req
        .get_identity()
        .map_err(|_| actix_web::error::ErrorUnauthorized("not signed in"))?;
    let token = identity
        .id()
        .map_err(|_| actix_web::error::ErrorUnauthorized("not signed in"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        actix_web::error::ErrorUnauthorized("invalid token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}
