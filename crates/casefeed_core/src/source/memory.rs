//! In-memory folder source.
//!
//! # Responsibility
//! - Serve one folder's records with the same paging semantics as the server.
//! - Record served filing queries so callers can assert request fan-out.
//!
//! # Invariants
//! - Filing pages are filtered, then stably sorted, then sliced.
//! - Requests for another folder fail with a 404-style `SourceError::Server`.

use crate::feed::aggregate::{contains_folded, SortDirection};
use crate::feed::normalize::resolve_date;
use crate::model::record::{EventRecord, FilingRecord, FolderId, NotificationRecord};
use crate::paging::query::{FilingFilter, FilingPage, FilingQuery, FilingSortField, PageMeta};
use crate::source::{EventSource, FilingSource, NotificationSource, SourceError, SourceResult};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;

/// Single-folder source backed by plain vectors.
#[derive(Debug)]
pub struct InMemorySource {
    folder_id: FolderId,
    filings: RefCell<Vec<FilingRecord>>,
    notifications: RefCell<Vec<NotificationRecord>>,
    events: RefCell<Vec<EventRecord>>,
    filing_requests: RefCell<Vec<FilingQuery>>,
    list_fetches: Cell<usize>,
    pending_failure: RefCell<Option<SourceError>>,
}

impl InMemorySource {
    /// Creates an empty source for `folder_id`.
    pub fn new(folder_id: FolderId) -> Self {
        Self {
            folder_id,
            filings: RefCell::new(Vec::new()),
            notifications: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            filing_requests: RefCell::new(Vec::new()),
            list_fetches: Cell::new(0),
            pending_failure: RefCell::new(None),
        }
    }

    pub fn with_filings(self, filings: Vec<FilingRecord>) -> Self {
        self.replace_filings(filings);
        self
    }

    pub fn with_notifications(self, notifications: Vec<NotificationRecord>) -> Self {
        *self.notifications.borrow_mut() = notifications;
        self
    }

    pub fn with_events(self, events: Vec<EventRecord>) -> Self {
        *self.events.borrow_mut() = events;
        self
    }

    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }

    /// Replaces the stored filings, as a server-side mutation would.
    pub fn replace_filings(&self, filings: Vec<FilingRecord>) {
        *self.filings.borrow_mut() = filings;
    }

    /// Removes one filing by id. Returns whether it existed.
    pub fn remove_filing(&self, id: &str) -> bool {
        let mut filings = self.filings.borrow_mut();
        let before = filings.len();
        filings.retain(|filing| filing.id != id);
        filings.len() != before
    }

    pub fn push_notification(&self, notification: NotificationRecord) {
        self.notifications.borrow_mut().push(notification);
    }

    pub fn push_event(&self, event: EventRecord) {
        self.events.borrow_mut().push(event);
    }

    /// Makes the next fetch of any kind fail with `error`.
    pub fn fail_next(&self, error: SourceError) {
        *self.pending_failure.borrow_mut() = Some(error);
    }

    /// Filing queries served so far, oldest first.
    pub fn filing_requests(&self) -> Vec<FilingQuery> {
        self.filing_requests.borrow().clone()
    }

    /// Number of notification and event list fetches served.
    pub fn list_fetches(&self) -> usize {
        self.list_fetches.get()
    }

    fn check_request(&self, folder_id: FolderId) -> SourceResult<()> {
        if let Some(error) = self.pending_failure.borrow_mut().take() {
            return Err(error);
        }
        if folder_id != self.folder_id {
            return Err(SourceError::Server {
                status: 404,
                message: format!("folder not found: {folder_id}"),
            });
        }
        Ok(())
    }
}

impl FilingSource for InMemorySource {
    fn fetch_filings(&self, folder_id: FolderId, query: &FilingQuery) -> SourceResult<FilingPage> {
        self.filing_requests.borrow_mut().push(query.clone());
        self.check_request(folder_id)?;

        let needle = query.search.to_lowercase();
        let mut matched = self
            .filings
            .borrow()
            .iter()
            .filter(|filing| matches_filter(filing, &query.filter))
            .filter(|filing| matches_search(filing, needle.as_str()))
            .cloned()
            .collect::<Vec<_>>();

        matched.sort_by(|left, right| {
            let ordering = compare_by(left, right, query.sort_field);
            match query.sort_direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let meta = PageMeta::compute(query.page, query.page_size, matched.len() as u64);
        let size = query.page_size.max(1) as usize;
        let items = matched
            .into_iter()
            .skip((meta.page as usize - 1) * size)
            .take(size)
            .collect();

        Ok(FilingPage::new(items, meta))
    }
}

impl NotificationSource for InMemorySource {
    fn fetch_notifications(&self, folder_id: FolderId) -> SourceResult<Vec<NotificationRecord>> {
        self.list_fetches.set(self.list_fetches.get() + 1);
        self.check_request(folder_id)?;
        Ok(self.notifications.borrow().clone())
    }
}

impl EventSource for InMemorySource {
    fn fetch_events(&self, folder_id: FolderId) -> SourceResult<Vec<EventRecord>> {
        self.list_fetches.set(self.list_fetches.get() + 1);
        self.check_request(folder_id)?;
        Ok(self.events.borrow().clone())
    }
}

fn matches_filter(filing: &FilingRecord, filter: &FilingFilter) -> bool {
    if let Some(filing_type) = filter.type_filter.as_deref() {
        if !filing.filing_type.trim().eq_ignore_ascii_case(filing_type.trim()) {
            return false;
        }
    }
    if let Some(range) = filter.date_range {
        if !range.contains(resolve_date(filing.date.as_str()).date_naive()) {
            return false;
        }
    }
    true
}

fn matches_search(filing: &FilingRecord, needle: &str) -> bool {
    needle.is_empty()
        || contains_folded(filing.title.as_str(), needle)
        || contains_folded(filing.filing_type.as_str(), needle)
        || filing
            .description
            .as_deref()
            .is_some_and(|value| contains_folded(value, needle))
}

fn compare_by(left: &FilingRecord, right: &FilingRecord, field: FilingSortField) -> Ordering {
    match field {
        FilingSortField::Date => {
            resolve_date(left.date.as_str()).cmp(&resolve_date(right.date.as_str()))
        }
        FilingSortField::Title => left.title.to_lowercase().cmp(&right.title.to_lowercase()),
        FilingSortField::Type => left
            .filing_type
            .to_lowercase()
            .cmp(&right.filing_type.to_lowercase()),
    }
}
