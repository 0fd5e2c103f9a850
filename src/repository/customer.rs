use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        customer::{Customer, NewCustomer, UpdateCustomer},
        dashboard::DashboardAggregate,
        query::{FilterBucket, Page, PageQuery, RECENT_WINDOW_DAYS, SortColumn, SortDirection},
        types::CustomerId,
    },
    models::customer::{
        Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
    },
    repository::{
        CustomerReader, CustomerWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::customers,
};

type BoxedCustomers = customers::BoxedQuery<'static, Sqlite>;

/// Escapes LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn recent_cutoff(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(RECENT_WINDOW_DAYS)
}

/// Customers matching the bucket and search term of `query`, unordered.
fn matching(query: &PageQuery, now: NaiveDateTime) -> BoxedCustomers {
    let mut items = customers::table.into_boxed();

    items = match query.filter {
        FilterBucket::All => items,
        FilterBucket::Recent30Days => items.filter(customers::created_at.ge(recent_cutoff(now))),
        FilterBucket::PendingReview => items.filter(customers::reviewed.eq(false)),
    };

    if let Some(term) = &query.search {
        let pattern = format!("%{}%", escape_like(term));
        items = items.filter(
            customers::name
                .like(pattern.clone())
                .escape('\\')
                .or(customers::email.like(pattern.clone()).escape('\\'))
                .or(customers::phone.like(pattern.clone()).escape('\\'))
                .or(customers::address.like(pattern).escape('\\')),
        );
    }

    items
}

fn ordered(items: BoxedCustomers, column: SortColumn, direction: SortDirection) -> BoxedCustomers {
    let items = match (column, direction) {
        (SortColumn::Name, SortDirection::Asc) => items.order_by(customers::name.asc()),
        (SortColumn::Name, SortDirection::Desc) => items.order_by(customers::name.desc()),
        (SortColumn::Email, SortDirection::Asc) => items.order_by(customers::email.asc()),
        (SortColumn::Email, SortDirection::Desc) => items.order_by(customers::email.desc()),
        (SortColumn::Status, SortDirection::Asc) => items.order_by(customers::active.asc()),
        (SortColumn::Status, SortDirection::Desc) => items.order_by(customers::active.desc()),
        (SortColumn::CreatedAt, SortDirection::Asc) => items.order_by(customers::created_at.asc()),
        (SortColumn::CreatedAt, SortDirection::Desc) => {
            items.order_by(customers::created_at.desc())
        }
    };
    // Ties keep insertion order so paging is stable.
    items.then_order_by(customers::id.asc())
}

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        let mut conn = self.conn()?;

        let customer = customers::table
            .find(id.get())
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        customer
            .map(Customer::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_customers(
        &self,
        query: &PageQuery,
        now: NaiveDateTime,
    ) -> RepositoryResult<Page<Customer>> {
        let mut conn = self.conn()?;

        let total: i64 = matching(query, now).count().get_result(&mut conn)?;

        let items = ordered(matching(query, now), query.sort_column, query.sort_direction)
            .limit(query.sql_limit())
            .offset(query.sql_offset().unwrap_or(i64::MAX))
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(Customer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as usize))
    }

    fn dashboard_aggregate(&self, now: NaiveDateTime) -> RepositoryResult<DashboardAggregate> {
        let mut conn = self.conn()?;

        let total: i64 = customers::table.count().get_result(&mut conn)?;
        let recent: i64 = customers::table
            .filter(customers::created_at.ge(recent_cutoff(now)))
            .count()
            .get_result(&mut conn)?;
        let pending: i64 = customers::table
            .filter(customers::reviewed.eq(false))
            .count()
            .get_result(&mut conn)?;

        Ok(DashboardAggregate {
            total_count: total as usize,
            recent_count: recent as usize,
            pending_count: pending as usize,
        })
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        let mut conn = self.conn()?;

        let insertable: DbNewCustomer = new_customer.into();
        let created = diesel::insert_into(customers::table)
            .values(&insertable)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(created)?)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer> {
        let mut conn = self.conn()?;

        let changes: DbUpdateCustomer = updates.into();
        let updated = diesel::update(customers::table.find(id.get()))
            .set(&changes)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(updated)?)
    }

    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(customers::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
