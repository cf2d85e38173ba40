//! Core logic for the case-folder activity feed.
//! This crate owns feed ordering, paging and navigation invariants.

pub mod export;
pub mod feed;
pub mod logging;
pub mod model;
pub mod navigate;
pub mod paging;
pub mod service;
pub mod source;

pub use export::delimited::{
    parse_columns, serialize_to_delimited_text, serialize_with_delimiter, ExportColumn,
};
pub use feed::aggregate::{aggregate, FeedFilter, FeedSources, SortDirection};
pub use feed::normalize::{normalize, parse_date, resolve_date, EPOCH_SENTINEL};
pub use feed::page::{paginate, FeedPage};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::activity::{ActivityRecord, DueStatus, SourceRef};
pub use model::record::{EventRecord, FilingRecord, FolderId, NotificationRecord, SourceType};
pub use navigate::document_navigator::{
    DocumentNavigator, DocumentTarget, NavDirection, NavigationOutcome, NavigationStep,
    NavigatorState,
};
pub use paging::controller::{
    ApplyOutcome, FetchTicket, LoadStatus, PaginationController, PagingError,
};
pub use paging::query::{
    normalize_page_size, DateRange, FilingFilter, FilingPage, FilingQuery, FilingSortField,
    PageMeta, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use service::folder_feed_service::{FeedLoadReport, FolderFeedService};
pub use service::mutation::{MutationKind, MutationOutcome, SettledMutation};
pub use source::memory::InMemorySource;
pub use source::{
    EventSource, FilingSource, FolderSource, NotificationSource, SourceError, SourceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
