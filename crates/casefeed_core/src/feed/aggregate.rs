//! Unified activity feed aggregation.
//!
//! # Responsibility
//! - Merge filings, notifications and events into one chronological list.
//! - Apply source-type and free-text filters.
//!
//! # Invariants
//! - Pure function of its arguments; nothing is cached between calls.
//! - Without filters the output length equals the sum of input lengths.
//! - Sorting is stable: equal instants keep input order in both directions.
//! - Input order is filings, then notifications, then events.

use crate::feed::normalize::normalize;
use crate::model::activity::{ActivityRecord, SourceRef};
use crate::model::record::{EventRecord, FilingRecord, NotificationRecord, SourceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Chronological sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    /// Newest first; the feed default.
    #[default]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Set of source types shown by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFilter {
    enabled: BTreeSet<SourceType>,
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl FeedFilter {
    /// Filter with every source type enabled.
    pub fn all() -> Self {
        Self {
            enabled: SourceType::ALL.into_iter().collect(),
        }
    }

    /// Filter with exactly the given source types enabled.
    pub fn only(types: impl IntoIterator<Item = SourceType>) -> Self {
        Self {
            enabled: types.into_iter().collect(),
        }
    }

    pub fn enable(&mut self, source_type: SourceType) {
        self.enabled.insert(source_type);
    }

    pub fn disable(&mut self, source_type: SourceType) {
        self.enabled.remove(&source_type);
    }

    /// Flips one source type and returns its new state.
    pub fn toggle(&mut self, source_type: SourceType) -> bool {
        if self.enabled.remove(&source_type) {
            false
        } else {
            self.enabled.insert(source_type);
            true
        }
    }

    pub fn is_enabled(&self, source_type: SourceType) -> bool {
        self.enabled.contains(&source_type)
    }
}

/// Borrowed raw arrays for one aggregation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedSources<'a> {
    pub filings: &'a [FilingRecord],
    pub notifications: &'a [NotificationRecord],
    pub events: &'a [EventRecord],
}

/// Builds the merged, filtered and sorted activity feed.
///
/// `search_text` is matched case-insensitively as a substring of title,
/// description or sub-type, without trimming. Empty search text matches
/// every record.
pub fn aggregate<'a>(
    sources: FeedSources<'a>,
    filter: &FeedFilter,
    search_text: &str,
    direction: SortDirection,
) -> Vec<ActivityRecord<'a>> {
    let needle = search_text.to_lowercase();

    let mut records = merge(sources)
        .filter(|record| filter.is_enabled(record.source_type))
        .filter(|record| matches_search(record, needle.as_str()))
        .collect::<Vec<_>>();

    sort_records(&mut records, direction);
    records
}

/// Normalizes every input record in canonical merge order, unfiltered.
pub fn merge(sources: FeedSources<'_>) -> impl Iterator<Item = ActivityRecord<'_>> {
    let filings = sources.filings.iter().map(SourceRef::Filing);
    let notifications = sources.notifications.iter().map(SourceRef::Notification);
    let events = sources.events.iter().map(SourceRef::Event);
    filings.chain(notifications).chain(events).map(normalize)
}

/// Stable sort by `effective_date`.
pub fn sort_records(records: &mut [ActivityRecord<'_>], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => {
            records.sort_by(|left, right| left.effective_date.cmp(&right.effective_date));
        }
        SortDirection::Descending => {
            records.sort_by(|left, right| right.effective_date.cmp(&left.effective_date));
        }
    }
}

fn matches_search(record: &ActivityRecord<'_>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    contains_folded(record.title.as_str(), needle)
        || record
            .description
            .as_deref()
            .is_some_and(|value| contains_folded(value, needle))
        || contains_folded(record.sub_type.as_str(), needle)
}

pub(crate) fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::{FeedFilter, SortDirection};
    use crate::model::record::SourceType;

    #[test]
    fn default_filter_enables_every_source() {
        let filter = FeedFilter::default();
        for source_type in SourceType::ALL {
            assert!(filter.is_enabled(source_type));
        }
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut filter = FeedFilter::all();
        assert!(!filter.toggle(SourceType::Event));
        assert!(!filter.is_enabled(SourceType::Event));
        assert!(filter.toggle(SourceType::Event));
    }

    #[test]
    fn direction_toggles_back_and_forth() {
        assert_eq!(SortDirection::default(), SortDirection::Descending);
        assert_eq!(
            SortDirection::Descending.toggled().toggled(),
            SortDirection::Descending
        );
    }
}
