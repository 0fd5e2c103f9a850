//! Query descriptor types shared by the registry views and the repository.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Rows per page in the registry tables.
pub const PAGE_SIZE: usize = 10;

/// Page size used when a report needs every matching row at once.
pub const REPORT_PAGE_SIZE: usize = 10_000;

/// Width of the "recent" bucket, counted back from request time.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Mutually exclusive server-side predicates narrowing the customer set.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FilterBucket {
    /// No constraint.
    #[default]
    #[serde(rename = "all")]
    All,
    /// Created within the trailing [`RECENT_WINDOW_DAYS`].
    #[serde(rename = "last30days")]
    Recent30Days,
    /// Not reviewed yet.
    #[serde(rename = "pending")]
    PendingReview,
}

impl FilterBucket {
    pub const ALL: [FilterBucket; 3] = [
        FilterBucket::All,
        FilterBucket::Recent30Days,
        FilterBucket::PendingReview,
    ];

    /// Key used by quick-filter links and the session store.
    pub const fn key(self) -> &'static str {
        match self {
            FilterBucket::All => "all",
            FilterBucket::Recent30Days => "last30days",
            FilterBucket::PendingReview => "pending",
        }
    }

    /// Name understood by the paginated query endpoint.
    pub const fn rpc_name(self) -> &'static str {
        match self {
            FilterBucket::All => "todos",
            FilterBucket::Recent30Days => "ultimoMes",
            FilterBucket::PendingReview => "pendentes",
        }
    }
}

impl Display for FilterBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepts both the quick-filter keys and the endpoint names.
impl FromStr for FilterBucket {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "todos" => Ok(FilterBucket::All),
            "last30days" | "ultimoMes" => Ok(FilterBucket::Recent30Days),
            "pending" | "pendentes" => Ok(FilterBucket::PendingReview),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Sortable registry columns.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortColumn {
    #[default]
    #[serde(rename = "nome")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "created_at")]
    CreatedAt,
}

impl SortColumn {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "nome",
            SortColumn::Email => "email",
            SortColumn::Status => "status",
            SortColumn::CreatedAt => "created_at",
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nome" | "name" => Ok(SortColumn::Name),
            "email" => Ok(SortColumn::Email),
            "status" => Ok(SortColumn::Status),
            "created_at" | "createdAt" | "data" => Ok(SortColumn::CreatedAt),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Fully composed request for one page of customers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub filter: FilterBucket,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    /// Trimmed, non-empty search text.
    pub search: Option<String>,
}

impl PageQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            filter: FilterBucket::All,
            sort_column: SortColumn::Name,
            sort_direction: SortDirection::Asc,
            search: None,
        }
    }

    pub fn filter(mut self, filter: FilterBucket) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort_column = column;
        self.sort_direction = direction;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Number of rows to skip before this page, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }

    /// The offset as SQL sees it, or `None` when it does not fit an `i64`.
    pub fn sql_offset(&self) -> Option<i64> {
        (self.page.max(1) - 1)
            .checked_mul(self.page_size)
            .and_then(|offset| i64::try_from(offset).ok())
    }

    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }
}

/// One page of results plus the size of the whole matching set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
