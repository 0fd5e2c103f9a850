//! DTOs used by the registry table and the customer modal.

use serde::Serialize;

use crate::coordinator::TableQuery;
use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::forms::customer::{CustomerForm, FieldErrors};
use crate::pagination::Paginated;

/// Data required to render a customer table.
#[derive(Debug, Serialize)]
pub struct CustomerTableData {
    pub customers: Paginated<Customer>,
    pub query: TableQuery,
    /// Set when the page could not be loaded; the table is shown empty.
    pub load_failed: bool,
}

/// Data displayed inside the customer modal.
#[derive(Debug, Serialize)]
pub struct CustomerModalData {
    /// `None` when creating a new customer.
    pub customer_id: Option<CustomerId>,
    pub form: CustomerForm,
    pub errors: FieldErrors,
}

impl CustomerModalData {
    pub fn create() -> Self {
        Self {
            customer_id: None,
            form: CustomerForm::blank(),
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(customer: &Customer) -> Self {
        Self {
            customer_id: Some(customer.id),
            form: CustomerForm::from_customer(customer),
            errors: FieldErrors::default(),
        }
    }
}
