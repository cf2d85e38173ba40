//! Query and page envelope types for server-paginated filings.
//!
//! # Responsibility
//! - Describe one filings request (page, size, sort, filter, search).
//! - Describe the paging metadata returned by the server.
//!
//! # Invariants
//! - `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE` for issued queries.
//! - `PageMeta::total_pages >= 1`, even for an empty result.

use crate::feed::aggregate::SortDirection;
use crate::model::record::FilingRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sortable filing columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingSortField {
    #[default]
    Date,
    Title,
    Type,
}

impl FilingSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Type => "type",
        }
    }
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Returns whether `day` lies inside the range. Open bounds match anything.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// Server-side filing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingFilter {
    /// Exact filing type match (case-insensitive).
    pub type_filter: Option<String>,
    pub date_range: Option<DateRange>,
}

/// One filings request as sent to `FilingSource::fetch_filings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort_field: FilingSortField,
    pub sort_direction: SortDirection,
    pub filter: FilingFilter,
}

impl Default for FilingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_field: FilingSortField::default(),
            sort_direction: SortDirection::default(),
            filter: FilingFilter::default(),
        }
    }
}

/// Paging metadata reported alongside one page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::empty()
    }
}

impl PageMeta {
    /// Metadata of a not-yet-loaded or empty result.
    pub fn empty() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// Computes metadata for `page` over `total` items.
    ///
    /// `page` is clamped into `[1, total_pages]`.
    pub fn compute(page: u32, page_size: u32, total: u64) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total.div_ceil(size))
            .unwrap_or(u32::MAX)
            .max(1);
        let page = page.clamp(1, total_pages);
        Self {
            page,
            total_pages,
            total,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Filings page envelope returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingPage {
    pub items: Vec<FilingRecord>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl FilingPage {
    /// Builds a page envelope from items and computed metadata.
    pub fn new(items: Vec<FilingRecord>, meta: PageMeta) -> Self {
        Self {
            items,
            page: meta.page,
            total_pages: meta.total_pages,
            total: meta.total,
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        }
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            total_pages: self.total_pages,
            total: self.total,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Normalizes a requested page size: `None` and `0` use the default, large
/// values clamp to `MAX_PAGE_SIZE`.
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(value) => value.min(MAX_PAGE_SIZE),
    }
}
