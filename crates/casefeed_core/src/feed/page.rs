//! Client-side paging for the combined activity view.

use crate::model::activity::ActivityRecord;
use crate::paging::query::{normalize_page_size, PageMeta};

/// One page of an aggregated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage<'r, 'a> {
    pub items: &'r [ActivityRecord<'a>],
    pub meta: PageMeta,
    /// Effective normalized page size.
    pub applied_page_size: u32,
}

/// Slices `records` into the requested page.
///
/// Out-of-range pages clamp to the nearest valid page; an empty feed yields
/// page 1 of 1 with no items.
pub fn paginate<'r, 'a>(
    records: &'r [ActivityRecord<'a>],
    page: u32,
    page_size: Option<u32>,
) -> FeedPage<'r, 'a> {
    let applied_page_size = normalize_page_size(page_size);
    let meta = PageMeta::compute(page, applied_page_size, records.len() as u64);

    let size = applied_page_size as usize;
    let start = (meta.page as usize - 1).saturating_mul(size).min(records.len());
    let end = start.saturating_add(size).min(records.len());

    FeedPage {
        items: &records[start..end],
        meta,
        applied_page_size,
    }
}
