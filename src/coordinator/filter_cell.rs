use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::query::FilterBucket;

/// Shared, observable active filter bucket.
///
/// The dashboard cards write it and every table coordinator subscribes to it.
#[derive(Clone, Debug)]
pub struct FilterCell {
    sender: Arc<watch::Sender<FilterBucket>>,
}

impl FilterCell {
    pub fn new(initial: FilterBucket) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn get(&self) -> FilterBucket {
        *self.sender.borrow()
    }

    /// Stores `bucket`, notifying subscribers only when it changes.
    pub fn set(&self, bucket: FilterBucket) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == bucket {
                false
            } else {
                *current = bucket;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterBucket> {
        self.sender.subscribe()
    }
}

impl Default for FilterCell {
    fn default() -> Self {
        Self::new(FilterBucket::All)
    }
}
