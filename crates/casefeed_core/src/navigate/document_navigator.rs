//! Cross-page navigation between linked filing documents.
//!
//! # Responsibility
//! - Step to the next/previous filing that carries a document link.
//! - Cross into the adjacent server page when the loaded page is exhausted.
//!
//! # Invariants
//! - At most one adjacent-page request per navigation gesture; a linkless
//!   adjacent page ends the gesture as `Exhausted`.
//! - While a page request is pending, further gestures return `Busy`.
//! - Backward navigation into a new page selects its last linked record.

use crate::model::record::FilingRecord;
use crate::paging::controller::{FetchTicket, LoadStatus, PaginationController};
use crate::source::{FilingSource, SourceError};
use log::{debug, info};

/// Navigation direction through the filings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Forward,
    Backward,
}

impl NavDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

/// Navigator state between gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Idle,
    /// An adjacent page was requested with fetch sequence `seq`.
    AwaitingPage { direction: NavDirection, seq: u64 },
}

/// Document selected by a navigation gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    /// Server page the record lives on.
    pub page: u32,
    /// Position of the record on that page.
    pub index: usize,
    pub id: String,
    pub link: String,
}

/// Terminal result of one navigation gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Resolved(DocumentTarget),
    /// No further linked document in this direction.
    Exhausted,
    /// A previous gesture is still waiting for its page.
    Busy,
    /// The adjacent page fetch failed; the controller keeps its old page.
    Failed(SourceError),
    /// Another controller request replaced the navigator's page request.
    Superseded,
}

/// Immediate result of starting a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationStep {
    Done(NavigationOutcome),
    /// Execute the ticket, then call [`DocumentNavigator::on_page_settled`].
    AwaitingPage(FetchTicket),
}

/// Linked-document cursor over a [`PaginationController`].
#[derive(Debug, Clone)]
pub struct DocumentNavigator {
    state: NavigatorState,
}

impl Default for DocumentNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentNavigator {
    pub fn new() -> Self {
        Self {
            state: NavigatorState::Idle,
        }
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, NavigatorState::AwaitingPage { .. })
    }

    /// Starts a gesture from the record `current_id`.
    ///
    /// A `current_id` that is not on the loaded page scans the whole page
    /// (from the start going forward, from the end going backward).
    /// Gestures are rejected as `Busy` while any page request is in flight,
    /// including one issued by a search, sort, filter or refresh.
    pub fn navigate(
        &mut self,
        controller: &mut PaginationController,
        current_id: &str,
        direction: NavDirection,
    ) -> NavigationStep {
        if self.is_busy() || controller.is_loading() {
            debug!(
                "event=document_nav module=navigate status=busy direction={} controller_loading={}",
                direction.as_str(),
                controller.is_loading()
            );
            return NavigationStep::Done(NavigationOutcome::Busy);
        }

        let meta = controller.meta();
        let position = controller.position_of(current_id);
        let items = controller.items();
        let found = match direction {
            NavDirection::Forward => {
                let from = position.map_or(0, |index| index + 1);
                find_linked(items, from..items.len(), meta.page)
            }
            NavDirection::Backward => {
                let until = position.unwrap_or(items.len());
                find_linked(items, (0..until).rev(), meta.page)
            }
        };

        if let Some(target) = found {
            log_resolved(direction, &target, false);
            return NavigationStep::Done(NavigationOutcome::Resolved(target));
        }

        let adjacent = match direction {
            NavDirection::Forward if meta.has_next => meta.page.checked_add(1),
            NavDirection::Backward if meta.has_prev => meta.page.checked_sub(1),
            _ => None,
        };
        let Some(page) = adjacent else {
            info!(
                "event=document_nav module=navigate status=exhausted direction={} crossed_page=false",
                direction.as_str()
            );
            return NavigationStep::Done(NavigationOutcome::Exhausted);
        };

        match controller.set_page(page) {
            Ok(ticket) => {
                self.state = NavigatorState::AwaitingPage {
                    direction,
                    seq: ticket.seq(),
                };
                debug!(
                    "event=document_nav module=navigate status=awaiting_page direction={} page={}",
                    direction.as_str(),
                    page
                );
                NavigationStep::AwaitingPage(ticket)
            }
            Err(_) => NavigationStep::Done(NavigationOutcome::Exhausted),
        }
    }

    /// Finishes a pending gesture once the controller has settled.
    ///
    /// Returns `None` while idle or while the requested page is still loading.
    pub fn on_page_settled(
        &mut self,
        controller: &PaginationController,
    ) -> Option<NavigationOutcome> {
        let NavigatorState::AwaitingPage { direction, seq } = self.state else {
            return None;
        };

        if controller.latest_seq() != seq {
            self.state = NavigatorState::Idle;
            debug!(
                "event=document_nav module=navigate status=superseded direction={}",
                direction.as_str()
            );
            return Some(NavigationOutcome::Superseded);
        }

        match controller.status() {
            LoadStatus::Idle | LoadStatus::Loading => None,
            LoadStatus::Error => {
                self.state = NavigatorState::Idle;
                let error = controller
                    .last_error()
                    .cloned()
                    .unwrap_or_else(|| SourceError::Transport("page fetch failed".to_string()));
                Some(NavigationOutcome::Failed(error))
            }
            LoadStatus::Loaded => {
                self.state = NavigatorState::Idle;
                let items = controller.items();
                let page = controller.meta().page;
                let found = match direction {
                    NavDirection::Forward => find_linked(items, 0..items.len(), page),
                    NavDirection::Backward => find_linked(items, (0..items.len()).rev(), page),
                };
                match found {
                    Some(target) => {
                        log_resolved(direction, &target, true);
                        Some(NavigationOutcome::Resolved(target))
                    }
                    None => {
                        info!(
                            "event=document_nav module=navigate status=exhausted direction={} crossed_page=true",
                            direction.as_str()
                        );
                        Some(NavigationOutcome::Exhausted)
                    }
                }
            }
        }
    }

    /// Drops a pending gesture, e.g. when the viewer closes.
    pub fn cancel(&mut self) {
        self.state = NavigatorState::Idle;
    }

    /// Runs a whole gesture synchronously against `source`.
    pub fn navigate_with<S: FilingSource + ?Sized>(
        &mut self,
        controller: &mut PaginationController,
        source: &S,
        current_id: &str,
        direction: NavDirection,
    ) -> NavigationOutcome {
        match self.navigate(controller, current_id, direction) {
            NavigationStep::Done(outcome) => outcome,
            NavigationStep::AwaitingPage(ticket) => {
                controller.fetch_with(source, ticket);
                self.on_page_settled(controller)
                    .unwrap_or(NavigationOutcome::Superseded)
            }
        }
    }
}

fn find_linked(
    items: &[FilingRecord],
    mut indices: impl Iterator<Item = usize>,
    page: u32,
) -> Option<DocumentTarget> {
    indices.find_map(|index| {
        let item = &items[index];
        let link = item.link.as_deref().filter(|_| item.has_link())?;
        Some(DocumentTarget {
            page,
            index,
            id: item.id.clone(),
            link: link.to_string(),
        })
    })
}

fn log_resolved(direction: NavDirection, target: &DocumentTarget, crossed_page: bool) {
    info!(
        "event=document_nav module=navigate status=resolved direction={} page={} index={} crossed_page={}",
        direction.as_str(),
        target.page,
        target.index,
        crossed_page
    );
}
