use serde::{Deserialize, Serialize};

use crate::domain::query::FilterBucket;

/// Request-time counts shown on the dashboard cards.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardAggregate {
    pub total_count: usize,
    pub recent_count: usize,
    pub pending_count: usize,
}

impl DashboardAggregate {
    /// Count behind the card that activates `bucket`.
    pub fn count_for(&self, bucket: FilterBucket) -> usize {
        match bucket {
            FilterBucket::All => self.total_count,
            FilterBucket::Recent30Days => self.recent_count,
            FilterBucket::PendingReview => self.pending_count,
        }
    }
}
