//! DTOs for the printable report.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::query::FilterBucket;

/// Every customer matching the active filter and search, sorted by name.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub customers: Vec<Customer>,
    pub total_count: usize,
    pub filter: FilterBucket,
    pub search: Option<String>,
    pub generated_at: NaiveDateTime,
}
