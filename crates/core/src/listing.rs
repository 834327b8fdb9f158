//! Filtered, newest-first listing with optional pagination.
//!
//! [`ListQuery`] is the raw query string; [`ListQuery::parse`] turns it into a
//! [`ListFilter`] plus an optional [`PageRequest`]. Equality filters are ANDed;
//! the free-text `q` matches case-insensitively against any of the entity's
//! search fields and is ANDed with the rest.
//!
//! [`select`] evaluates a filter over records already in memory. SQL-backed
//! stores translate the same [`ListFilter`] into a `WHERE` clause and must
//! agree with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::{ORDER_PATCH_POLICY, PatchError};
use crate::types::{Order, Status, TiTicket};
use crate::validation::ValidationError;

/// Page size used when only `page` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Larger requested page sizes are capped to this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing query parameters, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub sector: Option<String>,
    pub name_or_store: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Why a listing query was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListQueryError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Status(#[from] PatchError),
}

/// Conjunctive filter over a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub sector: Option<String>,
    pub name_or_store: Option<String>,
    /// Free text, matched case-insensitively as a substring.
    pub q: Option<String>,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Rows to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.page_size
    }
}

/// Records selected by a store, plus the size of the unpaginated match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Paginated response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap a store slice with the page it was cut for.
    #[must_use]
    pub fn new(slice: Slice<T>, request: PageRequest) -> Self {
        Self {
            total: slice.total,
            page: request.page,
            page_size: request.page_size,
            items: slice.items,
        }
    }
}

impl ListQuery {
    /// Validate the query. Blank parameters are treated as absent.
    ///
    /// # Errors
    ///
    /// - [`PatchError::InvalidEnum`] for an unknown `status`
    /// - [`ValidationError::InvalidQuery`] for a non-numeric or zero
    ///   `page`/`pageSize`
    pub fn parse(&self) -> Result<(ListFilter, Option<PageRequest>), ListQueryError> {
        let status = match non_blank(self.status.as_deref()) {
            Some(raw) => Some(
                ORDER_PATCH_POLICY.status(&serde_json::Value::String(raw.to_owned()))?,
            ),
            None => None,
        };

        let filter = ListFilter {
            status,
            sector: non_blank(self.sector.as_deref()).map(str::to_owned),
            name_or_store: non_blank(self.name_or_store.as_deref()).map(str::to_owned),
            q: non_blank(self.q.as_deref()).map(str::to_owned),
        };

        let page = non_blank(self.page.as_deref());
        let page_size = non_blank(self.page_size.as_deref());
        if page.is_none() && page_size.is_none() {
            return Ok((filter, None));
        }

        let page = page.map_or(Ok(1), |raw| positive(raw, "page"))?;
        let page_size = page_size
            .map_or(Ok(DEFAULT_PAGE_SIZE), |raw| positive(raw, "pageSize"))?
            .min(MAX_PAGE_SIZE);

        Ok((filter, Some(PageRequest { page, page_size })))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn positive(raw: &str, name: &'static str) -> Result<u32, ValidationError> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(ValidationError::InvalidQuery {
            name,
            reason: "must be a whole number of at least 1",
        })
}

/// A record type that can be filtered and ordered by [`select`].
pub trait Listable {
    /// Column names searched by `q`, in the order of [`Self::search_values`].
    const SEARCH_COLUMNS: &'static [&'static str];

    fn sort_key(&self) -> (DateTime<Utc>, i32);
    fn status(&self) -> Status;
    fn sector(&self) -> &str;
    fn name_or_store(&self) -> &str;
    fn search_values(&self) -> Vec<Option<&str>>;
}

impl Listable for Order {
    const SEARCH_COLUMNS: &'static [&'static str] = &["item", "obs", "response"];

    fn sort_key(&self) -> (DateTime<Utc>, i32) {
        (self.created_at, self.id.as_i32())
    }

    fn status(&self) -> Status {
        self.status
    }

    fn sector(&self) -> &str {
        &self.sector
    }

    fn name_or_store(&self) -> &str {
        &self.name_or_store
    }

    fn search_values(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.item.as_str()),
            self.obs.as_deref(),
            self.response.as_deref(),
        ]
    }
}

impl Listable for TiTicket {
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "description", "response"];

    fn sort_key(&self) -> (DateTime<Utc>, i32) {
        (self.created_at, self.id.as_i32())
    }

    fn status(&self) -> Status {
        self.status
    }

    fn sector(&self) -> &str {
        &self.sector
    }

    fn name_or_store(&self) -> &str {
        &self.name_or_store
    }

    fn search_values(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.response.as_deref(),
        ]
    }
}

impl ListFilter {
    /// Whether a record passes every provided condition.
    #[must_use]
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        if self.status.is_some_and(|s| s != record.status()) {
            return false;
        }
        if self.sector.as_deref().is_some_and(|s| s != record.sector()) {
            return false;
        }
        if self
            .name_or_store
            .as_deref()
            .is_some_and(|n| n != record.name_or_store())
        {
            return false;
        }
        match &self.q {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                record
                    .search_values()
                    .into_iter()
                    .flatten()
                    .any(|value| value.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Filter, order newest first (ties broken by id, descending) and paginate.
///
/// A page past the end yields no items but the correct total.
pub fn select<'a, T, I>(records: I, filter: &ListFilter, page: Option<PageRequest>) -> Slice<T>
where
    T: Listable + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut matched: Vec<&T> = records
        .into_iter()
        .filter(|record| filter.matches(*record))
        .collect();
    matched.sort_by_key(|record| std::cmp::Reverse(record.sort_key()));

    let total = matched.len() as u64;
    let items = match page {
        None => matched.into_iter().cloned().collect(),
        Some(request) => {
            let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
            matched
                .into_iter()
                .skip(offset)
                .take(request.limit() as usize)
                .cloned()
                .collect()
        }
    };

    Slice { items, total }
}
