//! Storage gateway: read and write traits plus their Diesel implementation.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::dashboard::DashboardAggregate;
use crate::domain::profile::{NewProfile, Profile};
use crate::domain::query::{Page, PageQuery};
use crate::domain::types::{CustomerId, ProfileEmail, ProfileId, Role};
use crate::repository::errors::RepositoryResult;

pub mod customer;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod profile;

/// Diesel-backed repository shared by all handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

pub trait CustomerReader {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
    /// One page of customers plus the size of the whole matching set.
    /// `now` anchors the recent bucket.
    fn list_customers(&self, query: &PageQuery, now: NaiveDateTime)
    -> RepositoryResult<Page<Customer>>;
    fn dashboard_aggregate(&self, now: NaiveDateTime) -> RepositoryResult<DashboardAggregate>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()>;
}

pub trait ProfileReader {
    fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>>;
    fn get_profile_by_email(&self, email: &ProfileEmail) -> RepositoryResult<Option<Profile>>;
    /// Every profile, newest first.
    fn list_profiles(&self) -> RepositoryResult<Vec<Profile>>;
    /// Returns the profile when `password` matches the stored hash.
    fn verify_credentials(
        &self,
        email: &ProfileEmail,
        password: &str,
    ) -> RepositoryResult<Option<Profile>>;
}

pub trait ProfileWriter {
    fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
    fn update_profile_role(&self, id: ProfileId, role: Role) -> RepositoryResult<Profile>;
}
