//! DTOs exposed by the JSON API endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;

/// Query parameters accepted by `/api/v1/customers`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersQuery {
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
    /// `todos`, `ultimoMes` or `pendentes`.
    pub filter_type: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub search_term: Option<String>,
}

/// One page of customers plus the size of the whole matching set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersResponse {
    pub items: Vec<Customer>,
    pub total_count: usize,
}
