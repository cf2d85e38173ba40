//! Per-folder activity feed service.
//!
//! # Responsibility
//! - Own one folder's filings controller, notification/event arrays and
//!   document navigator.
//! - Drive fetches against a `FolderSource` and react to mutations.
//!
//! # Invariants
//! - A failed fetch never blanks previously loaded data.
//! - Folder instances share no state with each other.
//! - Mutations refresh only the source they touched, and only on success.

use crate::export::delimited::{serialize_to_delimited_text, ExportColumn};
use crate::feed::aggregate::{aggregate, FeedFilter, FeedSources, SortDirection};
use crate::model::activity::ActivityRecord;
use crate::model::record::{EventRecord, FolderId, NotificationRecord, SourceType};
use crate::navigate::document_navigator::{DocumentNavigator, NavDirection, NavigationOutcome};
use crate::paging::controller::{ApplyOutcome, FetchTicket, PaginationController};
use crate::service::mutation::{MutationOutcome, SettledMutation};
use crate::source::{FolderSource, SourceError, SourceResult};
use log::{info, warn};

/// Per-source result of [`FolderFeedService::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLoadReport {
    pub filings: ApplyOutcome,
    /// Number of notifications loaded, or the fetch error.
    pub notifications: SourceResult<usize>,
    /// Number of events loaded, or the fetch error.
    pub events: SourceResult<usize>,
}

impl FeedLoadReport {
    /// Returns whether every source loaded.
    pub fn is_success(&self) -> bool {
        self.filings.is_applied() && self.notifications.is_ok() && self.events.is_ok()
    }

    /// Errors to hand to the notification collaborator, in source order.
    pub fn errors(&self) -> Vec<&SourceError> {
        let mut errors = Vec::new();
        if let ApplyOutcome::Failed(err) = &self.filings {
            errors.push(err);
        }
        if let Err(err) = &self.notifications {
            errors.push(err);
        }
        if let Err(err) = &self.events {
            errors.push(err);
        }
        errors
    }
}

/// Activity feed facade for one case folder.
pub struct FolderFeedService<S: FolderSource> {
    source: S,
    filings: PaginationController,
    notifications: Vec<NotificationRecord>,
    events: Vec<EventRecord>,
    navigator: DocumentNavigator,
}

impl<S: FolderSource> FolderFeedService<S> {
    /// Creates an unloaded service for `folder_id`.
    pub fn new(source: S, folder_id: FolderId, page_size: Option<u32>) -> Self {
        Self {
            source,
            filings: PaginationController::new(folder_id, page_size),
            notifications: Vec::new(),
            events: Vec::new(),
            navigator: DocumentNavigator::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn folder_id(&self) -> FolderId {
        self.filings.folder_id()
    }

    pub fn filings(&self) -> &PaginationController {
        &self.filings
    }

    /// Mutable controller access for paging/sort/filter/search commands.
    /// Hand the returned ticket to [`Self::execute`].
    pub fn filings_mut(&mut self) -> &mut PaginationController {
        &mut self.filings
    }

    pub fn notifications(&self) -> &[NotificationRecord] {
        &self.notifications
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn navigator(&self) -> &DocumentNavigator {
        &self.navigator
    }

    /// Fetches all three sources.
    pub fn load(&mut self) -> FeedLoadReport {
        let report = FeedLoadReport {
            filings: self.reload_filings(),
            notifications: self.reload_notifications(),
            events: self.reload_events(),
        };
        if report.is_success() {
            info!(
                "event=feed_load module=service status=ok filings={} notifications={} events={}",
                self.filings.items().len(),
                self.notifications.len(),
                self.events.len()
            );
        } else {
            warn!(
                "event=feed_load module=service status=partial errors={}",
                report.errors().len()
            );
        }
        report
    }

    /// Executes a controller ticket against the source.
    pub fn execute(&mut self, ticket: FetchTicket) -> ApplyOutcome {
        self.filings.fetch_with(&self.source, ticket)
    }

    /// Re-fetches the current filings page.
    pub fn reload_filings(&mut self) -> ApplyOutcome {
        let ticket = self.filings.refresh();
        self.execute(ticket)
    }

    /// Re-fetches notifications, keeping the old array on failure.
    pub fn reload_notifications(&mut self) -> SourceResult<usize> {
        let fetched = self.source.fetch_notifications(self.folder_id());
        replace_on_success(&mut self.notifications, fetched, SourceType::Notification)
    }

    /// Re-fetches events, keeping the old array on failure.
    pub fn reload_events(&mut self) -> SourceResult<usize> {
        let fetched = self.source.fetch_events(self.folder_id());
        replace_on_success(&mut self.events, fetched, SourceType::Event)
    }

    /// Aggregates the loaded filings page, notifications and events.
    pub fn feed(
        &self,
        filter: &FeedFilter,
        search_text: &str,
        direction: SortDirection,
    ) -> Vec<ActivityRecord<'_>> {
        let sources = FeedSources {
            filings: self.filings.items(),
            notifications: &self.notifications,
            events: &self.events,
        };
        aggregate(sources, filter, search_text, direction)
    }

    /// Exports the aggregated feed as delimited text.
    pub fn export(
        &self,
        filter: &FeedFilter,
        search_text: &str,
        direction: SortDirection,
        columns: &[ExportColumn],
    ) -> String {
        serialize_to_delimited_text(&self.feed(filter, search_text, direction), columns)
    }

    /// Steps the document viewer to the next/previous linked filing.
    pub fn navigate_document(
        &mut self,
        current_id: &str,
        direction: NavDirection,
    ) -> NavigationOutcome {
        self.navigator
            .navigate_with(&mut self.filings, &self.source, current_id, direction)
    }

    /// Reacts to a mutation performed by an external collaborator.
    pub fn settle_mutation<T>(&mut self, outcome: MutationOutcome<T>) -> SettledMutation<T> {
        let MutationOutcome {
            target,
            kind,
            result,
        } = outcome;

        if let Err(err) = &result {
            warn!(
                "event=mutation_settled module=service status=error target={} kind={} error_code={}",
                target.as_str(),
                kind.as_str(),
                err.code()
            );
            return SettledMutation {
                payload: result,
                refresh: None,
            };
        }

        let refresh = match target {
            SourceType::Filing => match self.reload_filings() {
                ApplyOutcome::Failed(err) => Err(err),
                ApplyOutcome::Applied | ApplyOutcome::Stale { .. } => Ok(()),
            },
            SourceType::Notification => self.reload_notifications().map(|_| ()),
            SourceType::Event => self.reload_events().map(|_| ()),
        };
        info!(
            "event=mutation_settled module=service status=ok target={} kind={} refreshed={}",
            target.as_str(),
            kind.as_str(),
            refresh.is_ok()
        );

        SettledMutation {
            payload: result,
            refresh: Some(refresh),
        }
    }
}

fn replace_on_success<T>(
    current: &mut Vec<T>,
    fetched: SourceResult<Vec<T>>,
    source_type: SourceType,
) -> SourceResult<usize> {
    match fetched {
        Ok(records) => {
            *current = records;
            Ok(current.len())
        }
        Err(err) => {
            warn!(
                "event=list_fetch module=service status=error source={} error_code={} error={}",
                source_type.as_str(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}
