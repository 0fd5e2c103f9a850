//! Filter, sort and search coordination for the customer tables.
//!
//! [`TableQuery`] holds the parameters a table is showing and applies user
//! intents to them. Every setter other than [`TableQuery::set_page`] sends the
//! table back to page 1. The web views keep a `TableQuery` in the session; the
//! [`driver::TableCoordinator`] owns one and adds debounced search plus
//! sequenced fetches.

use serde::{Deserialize, Serialize};

use crate::domain::query::{FilterBucket, PAGE_SIZE, PageQuery, SortColumn, SortDirection};

pub mod debounce;
pub mod driver;
pub mod filter_cell;
pub mod sequence;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use driver::{CoordinatorHandle, Notice, TableCoordinator, TableIntent, TableView};
pub use filter_cell::FilterCell;
pub use sequence::{FetchSequence, Ticket};

/// Parameters of one registry table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableQuery {
    page: usize,
    page_size: usize,
    filter: FilterBucket,
    sort_column: SortColumn,
    sort_direction: SortDirection,
    /// Text as typed, shown back in the search box.
    search_input: String,
    /// Search term that takes part in the query.
    search: Option<String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl TableQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            filter: FilterBucket::All,
            sort_column: SortColumn::Name,
            sort_direction: SortDirection::Asc,
            search_input: String::new(),
            search: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> FilterBucket {
        self.filter
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Records the raw search text. It joins the query only once promoted.
    pub fn set_search_text(&mut self, raw: impl Into<String>) {
        self.search_input = raw.into();
        self.page = 1;
    }

    /// Makes `text` the effective search term. Blank text clears the search.
    pub fn promote_search(&mut self, text: &str) {
        let term = text.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self.page = 1;
    }

    /// Records and promotes in one step, for callers without a debounce.
    pub fn set_search(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.promote_search(&raw);
        self.set_search_text(raw);
    }

    /// Repeating the current column flips the direction, a new column starts
    /// ascending.
    pub fn set_sort(&mut self, column: SortColumn) {
        if column == self.sort_column {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    pub fn set_filter_bucket(&mut self, bucket: FilterBucket) {
        self.filter = bucket;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The query sent to the repository for the current state.
    pub fn descriptor(&self) -> PageQuery {
        let query = PageQuery::new(self.page, self.page_size)
            .filter(self.filter)
            .sort(self.sort_column, self.sort_direction);
        match &self.search {
            Some(term) => query.search(term.as_str()),
            None => query,
        }
    }
}
