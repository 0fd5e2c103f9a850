//! Diesel models representing staff profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::{NewProfile as DomainNewProfile, Profile as DomainProfile};
use crate::domain::types::{ProfileEmail, ProfileId, ProfileName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles)]
/// Diesel model for [`crate::domain::profile::Profile`].
pub struct Profile {
    pub id: Vec<u8>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
/// Insertable form of [`Profile`].
pub struct NewProfile<'a> {
    pub id: &'a [u8],
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProfileId::from_bytes(&profile.id)?,
            name: ProfileName::new(profile.name)?,
            email: ProfileEmail::new(profile.email)?,
            role: profile.role.parse()?,
            created_at: profile.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewProfile> for NewProfile<'a> {
    fn from(profile: &'a DomainNewProfile) -> Self {
        Self {
            id: profile.id.as_bytes(),
            name: profile.name.as_str(),
            email: profile.email.as_str(),
            role: profile.role.as_str(),
            password_hash: profile.password_hash.as_str(),
            created_at: profile.created_at,
        }
    }
}
