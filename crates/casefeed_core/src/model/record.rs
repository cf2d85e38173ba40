//! Raw source records as delivered by the folder read endpoints.
//!
//! # Responsibility
//! - Mirror the wire shape of filings, notifications and calendar events.
//! - Keep dates as the original text; resolution happens in `feed::normalize`.
//!
//! # Invariants
//! - `id` is unique within one source, never across sources.
//! - Records are treated as read-only once fetched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a legal case folder.
pub type FolderId = Uuid;

/// Which of the three folder streams a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Procedural docket entry ("movement").
    Filing,
    /// Formal service-of-process record.
    Notification,
    /// Calendar entry (hearing, reminder, deadline).
    Event,
}

impl SourceType {
    /// All source types in canonical merge order.
    pub const ALL: [SourceType; 3] = [Self::Filing, Self::Notification, Self::Event];

    /// Wire/export name of this source type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filing => "filing",
            Self::Notification => "notification",
            Self::Event => "event",
        }
    }

    /// Parses a wire name, accepting `movement` as an alias for filings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "filing" | "filings" | "movement" | "movements" => Some(Self::Filing),
            "notification" | "notifications" => Some(Self::Notification),
            "event" | "events" => Some(Self::Event),
            _ => None,
        }
    }
}

/// Docket entry attached to a case folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingRecord {
    pub id: String,
    /// Filing date as sent by the server.
    pub date: String,
    /// Filing category, e.g. `motion` or `ruling`.
    #[serde(rename = "type", default)]
    pub filing_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Procedural deadline derived from this filing, if any.
    #[serde(default)]
    pub expiration_date: Option<String>,
    /// URI of the attached document.
    #[serde(default)]
    pub link: Option<String>,
    /// Party that produced the filing.
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Service-of-process record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub date: String,
    /// Delivery channel, e.g. `certified_mail` or `court_notice`.
    #[serde(default)]
    pub channel: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Response deadline opened by the notification.
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Calendar entry tied to a case folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    /// Start of the event.
    pub start: String,
    /// Event kind, e.g. `hearing`, `reminder` or `deadline`.
    #[serde(default)]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hard deadline for deadline-like events.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
}

impl FilingRecord {
    /// Creates a filing with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        filing_type: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            filing_type: filing_type.into(),
            title: title.into(),
            description: None,
            expiration_date: None,
            link: None,
            party: None,
            completed: false,
        }
    }

    /// Sets the attached document link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Returns whether this filing carries a non-blank document link.
    pub fn has_link(&self) -> bool {
        has_link(self.link.as_deref())
    }
}

impl NotificationRecord {
    /// Creates a notification with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        channel: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            channel: channel.into(),
            title: title.into(),
            description: None,
            expiration_date: None,
            link: None,
            recipient: None,
        }
    }
}

impl EventRecord {
    /// Creates an event with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            kind: kind.into(),
            title: title.into(),
            description: None,
            deadline: None,
            link: None,
            organizer: None,
        }
    }
}

pub(crate) fn has_link(link: Option<&str>) -> bool {
    link.is_some_and(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{FilingRecord, SourceType};

    #[test]
    fn source_type_parse_accepts_movement_alias() {
        assert_eq!(SourceType::parse(" Movements "), Some(SourceType::Filing));
        assert_eq!(SourceType::parse("event"), Some(SourceType::Event));
        assert_eq!(SourceType::parse("task"), None);
    }

    #[test]
    fn blank_link_is_not_a_document() {
        let filing = FilingRecord::new("f1", "2024-01-01", "motion", "Motion").with_link("   ");
        assert!(!filing.has_link());
        let filing = filing.with_link("https://docs.example/f1.pdf");
        assert!(filing.has_link());
    }
}
