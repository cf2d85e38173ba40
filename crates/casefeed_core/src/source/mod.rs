//! Read-endpoint contracts for case-folder record streams.
//!
//! # Responsibility
//! - Define the three read endpoints the feed core consumes.
//! - Keep transport details behind trait boundaries.
//!
//! # Invariants
//! - Only filings are paginated at the source.
//! - Implementations report failures as `SourceError`, never by panicking.

use crate::model::record::{EventRecord, FolderId, NotificationRecord};
use crate::paging::query::{FilingPage, FilingQuery};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure reported by a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Request never produced a response (network, timeout, ...).
    Transport(String),
    /// Server answered with a non-success status.
    Server { status: u16, message: String },
    /// Response could not be decoded into records.
    InvalidData(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Server { status, message } => write!(f, "server error {status}: {message}"),
            Self::InvalidData(message) => write!(f, "invalid source data: {message}"),
        }
    }
}

impl Error for SourceError {}

impl SourceError {
    /// Stable short code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

/// Server-paginated filings ("movements") endpoint.
pub trait FilingSource {
    fn fetch_filings(&self, folder_id: FolderId, query: &FilingQuery) -> SourceResult<FilingPage>;
}

/// Unpaginated notifications endpoint.
pub trait NotificationSource {
    fn fetch_notifications(&self, folder_id: FolderId) -> SourceResult<Vec<NotificationRecord>>;
}

/// Unpaginated calendar events endpoint.
pub trait EventSource {
    fn fetch_events(&self, folder_id: FolderId) -> SourceResult<Vec<EventRecord>>;
}

/// All three folder endpoints behind one handle.
pub trait FolderSource: FilingSource + NotificationSource + EventSource {}

impl<T: FilingSource + NotificationSource + EventSource + ?Sized> FolderSource for T {}

impl<T: FilingSource + ?Sized> FilingSource for &T {
    fn fetch_filings(&self, folder_id: FolderId, query: &FilingQuery) -> SourceResult<FilingPage> {
        (**self).fetch_filings(folder_id, query)
    }
}

impl<T: NotificationSource + ?Sized> NotificationSource for &T {
    fn fetch_notifications(&self, folder_id: FolderId) -> SourceResult<Vec<NotificationRecord>> {
        (**self).fetch_notifications(folder_id)
    }
}

impl<T: EventSource + ?Sized> EventSource for &T {
    fn fetch_events(&self, folder_id: FolderId) -> SourceResult<Vec<EventRecord>> {
        (**self).fetch_events(folder_id)
    }
}
