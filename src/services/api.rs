//! Paginated customer query and dashboard counts for the JSON API.

use chrono::NaiveDateTime;

use crate::domain::dashboard::DashboardAggregate;
use crate::domain::query::{PAGE_SIZE, PageQuery, REPORT_PAGE_SIZE};
use crate::dto::api::{CustomersQuery, CustomersResponse};
use crate::repository::CustomerReader;
use crate::services::{ServiceError, ServiceResult};

fn parse<T: std::str::FromStr>(value: Option<&str>, name: &str) -> ServiceResult<Option<T>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ServiceError::Form(format!("invalid {name}: {value}")))
        })
        .transpose()
}

/// Builds the repository query from the request parameters.
pub fn page_query(params: &CustomersQuery) -> ServiceResult<PageQuery> {
    let page = params.page_number.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(PAGE_SIZE).min(REPORT_PAGE_SIZE);

    let mut query = PageQuery::new(page, page_size);
    if query.sql_offset().is_none() {
        return Err(ServiceError::Form(format!("invalid pageNumber: {page}")));
    }
    if let Some(filter) = parse(params.filter_type.as_deref(), "filterType")? {
        query = query.filter(filter);
    }
    let column = parse(params.sort_by.as_deref(), "sortBy")?.unwrap_or(query.sort_column);
    let direction =
        parse(params.sort_direction.as_deref(), "sortDirection")?.unwrap_or(query.sort_direction);
    query = query.sort(column, direction);
    if let Some(term) = &params.search_term {
        query = query.search(term.as_str());
    }
    Ok(query)
}

pub fn list_customers<R>(
    repo: &R,
    params: &CustomersQuery,
    now: NaiveDateTime,
) -> ServiceResult<CustomersResponse>
where
    R: CustomerReader + ?Sized,
{
    let query = page_query(params)?;
    let page = repo.list_customers(&query, now).map_err(|err| {
        log::error!("Failed to list customers: {err}");
        err
    })?;

    Ok(CustomersResponse {
        items: page.items,
        total_count: page.total_count,
    })
}

pub fn dashboard<R>(repo: &R, now: NaiveDateTime) -> ServiceResult<DashboardAggregate>
where
    R: CustomerReader + ?Sized,
{
    Ok(repo.dashboard_aggregate(now).map_err(|err| {
        log::error!("Failed to load dashboard aggregate: {err}");
        err
    })?)
}
