//! Canonical activity record shared by every feed view.
//!
//! # Responsibility
//! - Define the single shape the feed, navigator and export operate on.
//! - Keep a read-only back-reference to the raw source record.
//!
//! # Invariants
//! - `(source_type, id)` is unique across one merged feed.
//! - `effective_date` is always set; unparsable dates resolve to the epoch.
//! - Values are derived per aggregation pass and never persisted.

use crate::model::record::{has_link, EventRecord, FilingRecord, NotificationRecord, SourceType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Borrowed view of the raw record an activity was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRef<'a> {
    Filing(&'a FilingRecord),
    Notification(&'a NotificationRecord),
    Event(&'a EventRecord),
}

impl SourceRef<'_> {
    /// Source stream of the referenced record.
    pub fn source_type(&self) -> SourceType {
        match self {
            Self::Filing(_) => SourceType::Filing,
            Self::Notification(_) => SourceType::Notification,
            Self::Event(_) => SourceType::Event,
        }
    }

    /// Source-local identifier of the referenced record.
    pub fn id(&self) -> &str {
        match self {
            Self::Filing(record) => record.id.as_str(),
            Self::Notification(record) => record.id.as_str(),
            Self::Event(record) => record.id.as_str(),
        }
    }
}

/// Badge state derived from an activity's expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Expiration instant already passed.
    Expired,
    /// Expires later on the current UTC day.
    DueToday,
    /// Expires on a later day.
    Upcoming,
}

/// Normalized record rendered by the unified activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord<'a> {
    pub id: String,
    pub source_type: SourceType,
    /// Free-form classification (filing type, notification channel, event kind).
    pub sub_type: String,
    pub title: String,
    pub description: Option<String>,
    pub effective_date: DateTime<Utc>,
    /// Original date text, kept for display even when it failed to parse.
    pub raw_date_text: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub actor: Option<String>,
    /// Only populated for filings.
    pub completed: Option<bool>,
    #[serde(skip)]
    pub source: SourceRef<'a>,
}

impl ActivityRecord<'_> {
    /// Merge-unique key of this record.
    pub fn key(&self) -> (SourceType, &str) {
        (self.source_type, self.id.as_str())
    }

    /// Returns whether this record points at a non-blank document link.
    pub fn has_link(&self) -> bool {
        has_link(self.link.as_deref())
    }

    /// Derives the due/expired badge relative to `now`.
    ///
    /// Completed filings and records without expiration never carry a badge.
    pub fn due_status(&self, now: DateTime<Utc>) -> Option<DueStatus> {
        if self.completed == Some(true) {
            return None;
        }
        let expires_at = self.expiration_date?;
        if expires_at < now {
            Some(DueStatus::Expired)
        } else if expires_at.date_naive() == now.date_naive() {
            Some(DueStatus::DueToday)
        } else {
            Some(DueStatus::Upcoming)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DueStatus;
    use crate::feed::normalize::normalize;
    use crate::model::activity::SourceRef;
    use crate::model::record::FilingRecord;
    use chrono::{TimeZone, Utc};

    fn filing_expiring(expiration: &str) -> FilingRecord {
        let mut filing = FilingRecord::new("f1", "2024-03-01", "motion", "Motion to dismiss");
        filing.expiration_date = Some(expiration.to_string());
        filing
    }

    #[test]
    fn due_status_tracks_expiration_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();

        let expired = filing_expiring("2024-03-09");
        let record = normalize(SourceRef::Filing(&expired));
        assert_eq!(record.due_status(now), Some(DueStatus::Expired));

        let today = filing_expiring("2024-03-10T17:00:00Z");
        let record = normalize(SourceRef::Filing(&today));
        assert_eq!(record.due_status(now), Some(DueStatus::DueToday));

        let later = filing_expiring("15/03/2024");
        let record = normalize(SourceRef::Filing(&later));
        assert_eq!(record.due_status(now), Some(DueStatus::Upcoming));
    }

    #[test]
    fn completed_filing_has_no_badge() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let mut filing = filing_expiring("2024-03-01");
        filing.completed = true;
        let record = normalize(SourceRef::Filing(&filing));
        assert_eq!(record.due_status(now), None);
    }
}
