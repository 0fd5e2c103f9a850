//! Services behind the registry table and the customer modal.

use chrono::NaiveDateTime;

use crate::coordinator::TableQuery;
use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::dto::customers::{CustomerModalData, CustomerTableData};
use crate::forms::FormError;
use crate::forms::customer::{CustomerForm, CustomerPayload, FieldErrors, WriteAction};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::errors::RepositoryError;
use crate::repository::{CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Loads the page described by `query`. A failed read yields an empty table
/// flagged as failed rather than an error.
pub fn load_table<R>(repo: &R, query: TableQuery, now: NaiveDateTime) -> CustomerTableData
where
    R: CustomerReader + ?Sized,
{
    let descriptor = query.descriptor();
    match repo.list_customers(&descriptor, now) {
        Ok(page) => CustomerTableData {
            customers: Paginated::new(
                page.items,
                descriptor.page,
                page.total_count,
                descriptor.page_size,
            ),
            query,
            load_failed: false,
        },
        Err(err) => {
            log::error!("Failed to list customers: {err}");
            CustomerTableData {
                customers: Paginated::new(Vec::new(), descriptor.page, 0, descriptor.page_size),
                query,
                load_failed: true,
            }
        }
    }
}

/// Loads the modal body: blank for `None`, prefilled for an existing id.
pub fn load_modal<R>(repo: &R, customer_id: Option<i32>) -> ServiceResult<CustomerModalData>
where
    R: CustomerReader + ?Sized,
{
    let Some(id) = customer_id else {
        return Ok(CustomerModalData::create());
    };

    let customer = repo
        .get_customer_by_id(CustomerId::new(id)?)
        .map_err(|err| {
            log::error!("Failed to load customer {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(CustomerModalData::edit(&customer))
}

fn payload(form: CustomerForm) -> ServiceResult<CustomerPayload> {
    CustomerPayload::try_from(form).map_err(|err| match err {
        FormError::Validation(errors) => ServiceError::Fields(FieldErrors::from_validation(&errors)),
        other => ServiceError::from(other),
    })
}

fn rejected(err: RepositoryError, action: WriteAction) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::Constraint(constraint) => {
            ServiceError::Fields(FieldErrors::from_constraint(Some(constraint), action))
        }
        other => {
            log::error!("Customer write failed: {other}");
            ServiceError::Fields(FieldErrors::from_constraint(None, action))
        }
    }
}

pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
    now: NaiveDateTime,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let new_customer = payload(form)?.into_new(now);

    let customer = repo
        .create_customer(&new_customer)
        .map_err(|err| rejected(err, WriteAction::Create))?;

    log::info!("{} created customer {}", user.email, customer.id);
    Ok(customer)
}

/// Saves an edit; the record is marked reviewed.
pub fn update_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let id = CustomerId::new(customer_id)?;
    let updates = payload(form)?.into_update();

    let customer = repo
        .update_customer(id, &updates)
        .map_err(|err| rejected(err, WriteAction::Update))?;

    log::info!("{} updated customer {}", user.email, customer.id);
    Ok(customer)
}

pub fn delete_customer<R>(repo: &R, user: &AuthenticatedUser, customer_id: i32) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    let id = CustomerId::new(customer_id)?;

    repo.delete_customer(id)
        .map_err(|err| rejected(err, WriteAction::Delete))?;

    log::info!("{} deleted customer {id}", user.email);
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::query::{Page, SortColumn};
    use crate::domain::types::Role;
    use crate::repository::errors::Constraint;
    use crate::repository::mock::MockRepository;

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "9b2f6c3e-4d1a-4f7b-8c55-0d6f0a1b2c3d".to_string(),
            email: "staff@example.com".to_string(),
            name: "Staff".to_string(),
            role: Role::Collaborator,
            exp: 0,
        }
    }

    fn form() -> CustomerForm {
        CustomerForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "11".to_string(),
            address: "Rua A".to_string(),
            age: "30".to_string(),
            ..CustomerForm::blank()
        }
    }

    fn customer(id: i32) -> Customer {
        Customer {
            id: CustomerId::new(id).unwrap(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "11".to_string(),
            address: "Rua A".to_string(),
            age: 30,
            interests: None,
            feelings: None,
            values: None,
            other_info: None,
            active: true,
            reviewed: false,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn duplicate_email_becomes_an_email_field_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_customer()
            .times(1)
            .returning(|_| Err(RepositoryError::Constraint(Constraint::CustomerEmailUnique)));

        let result = create_customer(&repo, &staff(), form(), Utc::now().naive_utc());

        let Err(ServiceError::Fields(errors)) = result else {
            panic!("expected field errors");
        };
        assert_eq!(errors.fields.len(), 1);
        assert!(errors.fields.contains_key("email"));
        assert_eq!(errors.generic, None);
    }

    #[test]
    fn unclassified_failure_names_the_action() {
        let mut repo = MockRepository::new();
        repo.expect_update_customer()
            .times(1)
            .returning(|_, _| Err(RepositoryError::ConnectionError("down".to_string())));

        let Err(ServiceError::Fields(errors)) = update_customer(&repo, &staff(), 4, form()) else {
            panic!("expected field errors");
        };
        assert!(errors.fields.is_empty());
        assert_eq!(errors.generic.as_deref(), Some("Erro ao atualizar cliente"));
    }

    #[test]
    fn missing_required_fields_never_reach_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_create_customer().times(0);
        let mut blank = form();
        blank.name = "  ".to_string();

        let result = create_customer(&repo, &staff(), blank, Utc::now().naive_utc());

        let Err(ServiceError::Fields(errors)) = result else {
            panic!("expected field errors");
        };
        assert!(errors.fields.contains_key("name"));
    }

    #[test]
    fn update_marks_the_record_reviewed() {
        let mut repo = MockRepository::new();
        repo.expect_update_customer()
            .withf(|id, updates| id.get() == 4 && updates.fields.reviewed)
            .times(1)
            .returning(|_, _| Ok(customer(4)));

        update_customer(&repo, &staff(), 4, form()).unwrap();
    }

    #[test]
    fn deleting_a_missing_customer_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_customer()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_customer(&repo, &staff(), 8),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn failed_read_shows_an_empty_table() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers()
            .times(1)
            .returning(|_, _| Err(RepositoryError::DatabaseError("locked".to_string())));
        let mut query = TableQuery::default();
        query.set_page(3);

        let data = load_table(&repo, query, Utc::now().naive_utc());

        assert!(data.load_failed);
        assert!(data.customers.items.is_empty());
        assert_eq!(data.customers.total_count, 0);
        assert!(data.customers.pages.is_empty());
    }

    #[test]
    fn table_uses_the_stored_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers()
            .withf(|query, _| query.sort_column == SortColumn::Email && query.page == 1)
            .times(1)
            .returning(|_, _| Ok(Page::new(vec![customer(1)], 95)));
        let mut query = TableQuery::default();
        query.set_page(4);
        query.set_sort(SortColumn::Email);

        let data = load_table(&repo, query, Utc::now().naive_utc());

        assert_eq!(data.customers.total_pages, 10);
        assert_eq!(data.customers.items.len(), 1);
    }
}
