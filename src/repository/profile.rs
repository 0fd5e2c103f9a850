//! Repository implementation for staff profiles.

use diesel::prelude::*;

use crate::{
    domain::{
        profile::{NewProfile, Profile, verify_password},
        types::{ProfileEmail, ProfileId, Role},
    },
    models::profile::{NewProfile as DbNewProfile, Profile as DbProfile},
    repository::{
        DieselRepository, ProfileReader, ProfileWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::profiles,
};

impl ProfileReader for DieselRepository {
    fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>> {
        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::id.eq(id.as_bytes().to_vec()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        profile
            .map(Profile::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_profile_by_email(&self, email: &ProfileEmail) -> RepositoryResult<Option<Profile>> {
        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::email.eq(email.as_str()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        profile
            .map(Profile::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_profiles(&self) -> RepositoryResult<Vec<Profile>> {
        let mut conn = self.conn()?;

        let profiles = profiles::table
            .order((profiles::created_at.desc(), profiles::name.asc()))
            .load::<DbProfile>(&mut conn)?
            .into_iter()
            .map(Profile::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    fn verify_credentials(
        &self,
        email: &ProfileEmail,
        password: &str,
    ) -> RepositoryResult<Option<Profile>> {
        let mut conn = self.conn()?;

        let Some(db_profile) = profiles::table
            .filter(profiles::email.eq(email.as_str()))
            .first::<DbProfile>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        if !verify_password(password, &db_profile.password_hash) {
            return Ok(None);
        }

        Ok(Some(Profile::try_from(db_profile)?))
    }
}

impl ProfileWriter for DieselRepository {
    fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile> {
        let mut conn = self.conn()?;

        let insertable: DbNewProfile = new_profile.into();
        let created = diesel::insert_into(profiles::table)
            .values(&insertable)
            .get_result::<DbProfile>(&mut conn)?;

        Ok(Profile::try_from(created)?)
    }

    fn update_profile_role(&self, id: ProfileId, role: Role) -> RepositoryResult<Profile> {
        let mut conn = self.conn()?;

        let updated = diesel::update(profiles::table.filter(profiles::id.eq(id.as_bytes().to_vec())))
            .set(profiles::role.eq(role.as_str()))
            .get_result::<DbProfile>(&mut conn)?;

        Ok(Profile::try_from(updated)?)
    }
}
