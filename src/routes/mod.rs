//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::coordinator::TableQuery;
use crate::models::auth::AuthenticatedUser;
use crate::settings::{SessionSettings, TableKey, ViewSettings};

pub mod api;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod management;
pub mod reports;
pub mod settings;

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every full page: alerts, the signed-in user, the
/// highlighted navigation entry and the view settings.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    view: &ViewSettings,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("settings", view);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Request time used for the "recent" bucket.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Table intents carried by the query string of a table page.
///
/// Pagination links carry only `page`; a `q` next to it would send the table
/// back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub page: Option<usize>,
}

impl TableParams {
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.sort.is_none() && self.filter.is_none() && self.page.is_none()
    }

    /// Applies the intents in a fixed order so an explicit page wins over the
    /// resets caused by the others. Unknown values are ignored.
    pub fn apply(&self, query: &mut TableQuery) {
        if let Some(filter) = &self.filter {
            match filter.parse() {
                Ok(bucket) => query.set_filter_bucket(bucket),
                Err(err) => log::warn!("Ignoring filter intent: {err}"),
            }
        }
        if let Some(sort) = &self.sort {
            match sort.parse() {
                Ok(column) => query.set_sort(column),
                Err(err) => log::warn!("Ignoring sort intent: {err}"),
            }
        }
        if let Some(text) = &self.q {
            query.set_search(text.as_str());
        }
        if let Some(page) = self.page {
            query.set_page(page);
        }
    }
}

/// Loads the stored query of `table`, applies `params` and stores the result.
/// A changed bucket becomes the shared filter of every table.
pub fn table_state(session: &Session, table: TableKey, params: &TableParams) -> TableQuery {
    let settings = SessionSettings::new(session);
    let mut query = settings.table(table);
    if params.is_empty() {
        return query;
    }

    let before = query.filter();
    params.apply(&mut query);

    if query.filter() != before {
        if let Err(err) = settings.set_filter(query.filter()) {
            log::error!("Failed to store the filter bucket: {err}");
        }
    }
    if let Err(err) = settings.store_table(table, &query) {
        log::error!("Failed to store the table state: {err}");
    }
    query
}
