//! View settings kept in the cookie session.
//!
//! The active filter bucket is shared by every table and survives reloads.
//! Each table also keeps its own [`TableQuery`]; when the shared bucket moved
//! on since the query was stored, the stored query follows it.

use actix_session::{Session, SessionInsertError};
use serde::Serialize;

use crate::coordinator::TableQuery;
use crate::domain::query::FilterBucket;

pub const FILTER_KEY: &str = "cadastros_filter";
pub const DARK_MODE_KEY: &str = "darkMode";

/// Tables whose state is stored per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKey {
    Dashboard,
    Customers,
    Reports,
}

impl TableKey {
    const fn session_key(self) -> &'static str {
        match self {
            TableKey::Dashboard => "table.dashboard",
            TableKey::Customers => "table.customers",
            TableKey::Reports => "table.reports",
        }
    }
}

/// Settings every page needs to render its chrome.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ViewSettings {
    pub filter: FilterBucket,
    pub dark_mode: bool,
}

/// Typed access to the settings stored in `session`.
pub struct SessionSettings<'a> {
    session: &'a Session,
}

impl<'a> SessionSettings<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.session.get::<T>(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Discarding unreadable session value {key}: {err}");
                self.session.remove(key);
                None
            }
        }
    }

    /// Active filter bucket, `All` when none was chosen yet.
    pub fn filter(&self) -> FilterBucket {
        self.read(FILTER_KEY).unwrap_or_default()
    }

    pub fn set_filter(&self, bucket: FilterBucket) -> Result<(), SessionInsertError> {
        self.session.insert(FILTER_KEY, bucket)
    }

    pub fn dark_mode(&self) -> bool {
        self.read(DARK_MODE_KEY).unwrap_or(false)
    }

    /// Flips dark mode and returns the new value.
    pub fn toggle_dark_mode(&self) -> Result<bool, SessionInsertError> {
        let enabled = !self.dark_mode();
        self.session.insert(DARK_MODE_KEY, enabled)?;
        Ok(enabled)
    }

    pub fn view(&self) -> ViewSettings {
        ViewSettings {
            filter: self.filter(),
            dark_mode: self.dark_mode(),
        }
    }

    /// Stored query of `table`, synced with the shared filter bucket.
    pub fn table(&self, table: TableKey) -> TableQuery {
        let mut query: TableQuery = self.read(table.session_key()).unwrap_or_default();
        let shared = self.filter();
        if query.filter() != shared {
            query.set_filter_bucket(shared);
        }
        query
    }

    pub fn store_table(&self, table: TableKey, query: &TableQuery) -> Result<(), SessionInsertError> {
        self.session.insert(table.session_key(), query)
    }
}
