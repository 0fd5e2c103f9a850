//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::dashboard::DashboardAggregate;
use crate::domain::profile::{NewProfile, Profile};
use crate::domain::query::{Page, PageQuery};
use crate::domain::types::{CustomerId, ProfileEmail, ProfileId, Role};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerReader, CustomerWriter, ProfileReader, ProfileWriter};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
        fn list_customers(
            &self,
            query: &PageQuery,
            now: NaiveDateTime,
        ) -> RepositoryResult<Page<Customer>>;
        fn dashboard_aggregate(&self, now: NaiveDateTime) -> RepositoryResult<DashboardAggregate>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(
            &self,
            id: CustomerId,
            updates: &UpdateCustomer,
        ) -> RepositoryResult<Customer>;
        fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()>;
    }

    impl ProfileReader for Repository {
        fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>>;
        fn get_profile_by_email(&self, email: &ProfileEmail) -> RepositoryResult<Option<Profile>>;
        fn list_profiles(&self) -> RepositoryResult<Vec<Profile>>;
        fn verify_credentials(
            &self,
            email: &ProfileEmail,
            password: &str,
        ) -> RepositoryResult<Option<Profile>>;
    }

    impl ProfileWriter for Repository {
        fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
        fn update_profile_role(&self, id: ProfileId, role: Role) -> RepositoryResult<Profile>;
    }
}
