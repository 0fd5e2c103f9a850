//! Dashboard statistics.

use chrono::NaiveDateTime;

use crate::domain::query::FilterBucket;
use crate::dto::dashboard::{DashboardPageData, StatCard};
use crate::repository::CustomerReader;
use crate::services::ServiceResult;

fn card_title(bucket: FilterBucket) -> &'static str {
    match bucket {
        FilterBucket::All => "Total de cadastros",
        FilterBucket::Recent30Days => "Cadastros nos últimos 30 dias",
        FilterBucket::PendingReview => "Cadastros com pendência de revisão",
    }
}

/// Counts computed at `now`, one card per bucket, with `active` highlighted.
pub fn load_dashboard<R>(
    repo: &R,
    active: FilterBucket,
    now: NaiveDateTime,
) -> ServiceResult<DashboardPageData>
where
    R: CustomerReader + ?Sized,
{
    let aggregate = repo.dashboard_aggregate(now).map_err(|err| {
        log::error!("Failed to load dashboard aggregate: {err}");
        err
    })?;

    let cards = FilterBucket::ALL
        .into_iter()
        .map(|bucket| StatCard {
            title: card_title(bucket),
            count: aggregate.count_for(bucket),
            bucket,
            active: bucket == active,
        })
        .collect();

    Ok(DashboardPageData { aggregate, cards })
}
