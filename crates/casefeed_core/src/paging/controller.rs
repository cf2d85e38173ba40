//! Source pagination controller for the filings table.
//!
//! # Responsibility
//! - Own one folder's server-driven filings page and its query state.
//! - Issue fetch tickets and apply responses under a single-flight gate.
//!
//! # Invariants
//! - Every issued fetch gets a strictly increasing sequence number.
//! - A response is applied only if its sequence equals the latest issued one;
//!   older responses are discarded silently ("last request wins").
//! - A failed fetch keeps the previous items and metadata.
//! - Sort, filter, search and page-size changes reset `page` to 1.

use crate::feed::aggregate::SortDirection;
use crate::model::record::{FilingRecord, FolderId};
use crate::paging::query::{
    normalize_page_size, FilingFilter, FilingPage, FilingQuery, FilingSortField, PageMeta,
};
use crate::source::{FilingSource, SourceError, SourceResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Load state of the controller's current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet.
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// Latest fetch was applied.
    Loaded,
    /// Latest fetch failed; previous data is kept.
    Error,
}

/// Rejected controller command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// Requested page is outside the known page range.
    PageOutOfRange { requested: u32, total_pages: u32 },
}

impl Display for PagingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageOutOfRange {
                requested,
                total_pages,
            } => write!(f, "page {requested} is outside 1..={total_pages}"),
        }
    }
}

impl Error for PagingError {}

/// One issued fetch. The caller executes `query` and hands the result back
/// through [`PaginationController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    folder_id: FolderId,
    query: FilingQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }

    pub fn query(&self) -> &FilingQuery {
        &self.query
    }
}

/// Result of handing a response back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Response was current and is now the displayed page.
    Applied,
    /// Response was current but the fetch failed; surface the error.
    Failed(SourceError),
    /// A newer fetch was issued after this one; the response was dropped.
    Stale { seq: u64, latest: u64 },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Server-side paging, sorting, filtering and search state for filings.
#[derive(Debug, Clone)]
pub struct PaginationController {
    folder_id: FolderId,
    query: FilingQuery,
    status: LoadStatus,
    items: Vec<FilingRecord>,
    meta: PageMeta,
    last_error: Option<SourceError>,
    latest_seq: u64,
    has_loaded: bool,
}

impl PaginationController {
    /// Creates an idle controller for one folder.
    pub fn new(folder_id: FolderId, page_size: Option<u32>) -> Self {
        Self {
            folder_id,
            query: FilingQuery {
                page_size: normalize_page_size(page_size),
                ..FilingQuery::default()
            },
            status: LoadStatus::Idle,
            items: Vec::new(),
            meta: PageMeta::empty(),
            last_error: None,
            latest_seq: 0,
            has_loaded: false,
        }
    }

    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }

    /// Query state the next fetch will use.
    pub fn query(&self) -> &FilingQuery {
        &self.query
    }

    /// Requested page (may differ from `meta().page` while loading or after an error).
    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.query.page_size
    }

    pub fn sort_field(&self) -> FilingSortField {
        self.query.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.query.sort_direction
    }

    pub fn filter(&self) -> &FilingFilter {
        &self.query.filter
    }

    pub fn search(&self) -> &str {
        self.query.search.as_str()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Items of the last applied page.
    pub fn items(&self) -> &[FilingRecord] {
        &self.items
    }

    /// Server metadata of the last applied page.
    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    /// Error of the latest failed fetch, cleared on the next applied page.
    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    /// Sequence number of the most recently issued fetch (`0` before any).
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Position of a record on the loaded page.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Requests page `page`, keeping sort, filter and search.
    ///
    /// Valid pages are `1..=total_pages`, plus `current ± 1` when the server
    /// reported a neighbour in that direction.
    pub fn set_page(&mut self, page: u32) -> Result<FetchTicket, PagingError> {
        let current = self.meta.page;
        // Servers may report zero pages for an empty result; page 1 stays valid.
        let last_page = self.meta.total_pages.max(1);
        let in_range = page >= 1 && page <= last_page;
        let next_neighbour = self.meta.has_next && Some(page) == current.checked_add(1);
        let prev_neighbour =
            self.meta.has_prev && page >= 1 && Some(page) == current.checked_sub(1);

        if !(in_range || next_neighbour || prev_neighbour) {
            return Err(PagingError::PageOutOfRange {
                requested: page,
                total_pages: self.meta.total_pages,
            });
        }

        self.query.page = page;
        Ok(self.issue("set_page"))
    }

    /// Changes the sort and restarts from page 1.
    pub fn set_sort(&mut self, field: FilingSortField, direction: SortDirection) -> FetchTicket {
        self.query.sort_field = field;
        self.query.sort_direction = direction;
        self.query.page = 1;
        self.issue("set_sort")
    }

    /// Replaces the filter and restarts from page 1.
    pub fn set_filter(&mut self, filter: FilingFilter) -> FetchTicket {
        self.query.filter = filter;
        self.query.page = 1;
        self.issue("set_filter")
    }

    /// Replaces the search text and restarts from page 1.
    pub fn set_search(&mut self, text: impl Into<String>) -> FetchTicket {
        self.query.search = text.into();
        self.query.page = 1;
        self.issue("set_search")
    }

    /// Changes the page size (normalized) and restarts from page 1.
    pub fn set_page_size(&mut self, page_size: Option<u32>) -> FetchTicket {
        self.query.page_size = normalize_page_size(page_size);
        self.query.page = 1;
        self.issue("set_page_size")
    }

    /// Re-issues the fetch for the current query, e.g. after a mutation.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue("refresh")
    }

    /// Makes any in-flight response inert.
    pub fn cancel_pending(&mut self) {
        if self.status != LoadStatus::Loading {
            return;
        }
        self.latest_seq += 1;
        self.status = if self.last_error.is_some() {
            LoadStatus::Error
        } else if self.has_loaded {
            LoadStatus::Loaded
        } else {
            LoadStatus::Idle
        };
        debug!(
            "event=filings_fetch module=paging status=cancelled latest_seq={}",
            self.latest_seq
        );
    }

    /// Applies the response of `ticket` through the single-flight gate.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: SourceResult<FilingPage>,
    ) -> ApplyOutcome {
        if ticket.seq != self.latest_seq || ticket.folder_id != self.folder_id {
            debug!(
                "event=filings_fetch module=paging status=stale_discarded seq={} latest_seq={}",
                ticket.seq, self.latest_seq
            );
            return ApplyOutcome::Stale {
                seq: ticket.seq,
                latest: self.latest_seq,
            };
        }

        match result {
            Ok(page) => {
                let meta = page.meta();
                info!(
                    "event=filings_fetch module=paging status=ok seq={} page={} total_pages={} items={}",
                    ticket.seq,
                    meta.page,
                    meta.total_pages,
                    page.items.len()
                );
                self.items = page.items;
                self.meta = meta;
                self.last_error = None;
                self.status = LoadStatus::Loaded;
                self.has_loaded = true;
                ApplyOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "event=filings_fetch module=paging status=error seq={} error_code={} error={}",
                    ticket.seq,
                    err.code(),
                    err
                );
                self.last_error = Some(err.clone());
                self.status = LoadStatus::Error;
                ApplyOutcome::Failed(err)
            }
        }
    }

    /// Executes `ticket` against `source` and applies the response.
    pub fn fetch_with<S: FilingSource + ?Sized>(
        &mut self,
        source: &S,
        ticket: FetchTicket,
    ) -> ApplyOutcome {
        let result = source.fetch_filings(ticket.folder_id, &ticket.query);
        self.complete(&ticket, result)
    }

    fn issue(&mut self, reason: &'static str) -> FetchTicket {
        self.latest_seq += 1;
        self.status = LoadStatus::Loading;
        debug!(
            "event=filings_fetch module=paging status=start reason={} seq={} page={} page_size={} sort={}:{}",
            reason,
            self.latest_seq,
            self.query.page,
            self.query.page_size,
            self.query.sort_field.as_str(),
            self.query.sort_direction.as_str()
        );
        FetchTicket {
            seq: self.latest_seq,
            folder_id: self.folder_id,
            query: self.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadStatus, PaginationController, PagingError};
    use crate::paging::query::{FilingPage, PageMeta};
    use uuid::Uuid;

    #[test]
    fn new_controller_is_idle_with_normalized_size() {
        let controller = PaginationController::new(Uuid::new_v4(), Some(0));
        assert_eq!(controller.status(), LoadStatus::Idle);
        assert_eq!(controller.page_size(), 10);
        assert_eq!(controller.latest_seq(), 0);
    }

    #[test]
    fn set_page_rejects_pages_outside_known_range() {
        let mut controller = PaginationController::new(Uuid::new_v4(), None);
        let err = controller.set_page(2).expect_err("page 2 is unknown before load");
        assert_eq!(
            err,
            PagingError::PageOutOfRange {
                requested: 2,
                total_pages: 1
            }
        );
        assert!(controller.set_page(0).is_err());
        assert_eq!(controller.latest_seq(), 0);
    }

    #[test]
    fn zero_total_pages_still_accepts_first_page() {
        let mut controller = PaginationController::new(Uuid::new_v4(), None);
        let ticket = controller.refresh();
        let empty = PageMeta {
            page: 1,
            total_pages: 0,
            total: 0,
            has_next: false,
            has_prev: false,
        };
        assert!(controller
            .complete(&ticket, Ok(FilingPage::new(Vec::new(), empty)))
            .is_applied());

        let ticket = controller.set_page(1).expect("page 1 of an empty result");
        assert_eq!(ticket.query().page, 1);
        assert!(controller.set_page(2).is_err());
    }

    #[test]
    fn cancel_pending_makes_late_response_inert() {
        let mut controller = PaginationController::new(Uuid::new_v4(), None);
        let ticket = controller.refresh();
        controller.cancel_pending();
        assert_eq!(controller.status(), LoadStatus::Idle);

        let outcome = controller.complete(
            &ticket,
            Ok(FilingPage::new(Vec::new(), PageMeta::compute(1, 10, 0))),
        );
        assert!(!outcome.is_applied());
        assert_eq!(controller.status(), LoadStatus::Idle);
    }
}
