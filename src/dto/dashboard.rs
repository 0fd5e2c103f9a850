use serde::Serialize;

use crate::domain::dashboard::DashboardAggregate;
use crate::domain::query::FilterBucket;

/// One statistics card; clicking it activates `bucket`.
#[derive(Debug, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub count: usize,
    pub bucket: FilterBucket,
    pub active: bool,
}

/// Data required to render the dashboard cards.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub aggregate: DashboardAggregate,
    pub cards: Vec<StatCard>,
}
