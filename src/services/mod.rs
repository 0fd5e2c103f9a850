//! Role-checked operations shared by the HTML routes, the JSON API and the
//! console front end.

use crate::domain::profile::Profile;
use crate::domain::types::Role;
use crate::models::auth::AuthenticatedUser;
use crate::repository::ProfileReader;

pub mod api;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod errors;
pub mod management;
pub mod reports;

pub use errors::{ServiceError, ServiceResult};

/// Loads the signed-in profile and fails with [`ServiceError::Unauthorized`]
/// unless its stored role is `role`. The role carried by the session token is
/// not trusted, so a demotion takes effect on the next request.
pub fn ensure_role<R>(repo: &R, user: &AuthenticatedUser, role: Role) -> ServiceResult<Profile>
where
    R: ProfileReader + ?Sized,
{
    let Some(id) = user.profile_id() else {
        return Err(ServiceError::Unauthorized);
    };

    let profile = repo
        .get_profile_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load profile {id}: {err}");
            err
        })?
        .ok_or(ServiceError::Unauthorized)?;

    if profile.role == role {
        Ok(profile)
    } else {
        Err(ServiceError::Unauthorized)
    }
}
