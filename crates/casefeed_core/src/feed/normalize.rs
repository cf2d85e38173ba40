//! Source record normalization.
//!
//! # Responsibility
//! - Convert filings, notifications and events into `ActivityRecord`.
//! - Resolve textual dates into comparable UTC instants.
//!
//! # Invariants
//! - Normalization never fails; unparsable dates degrade to `EPOCH_SENTINEL`.
//! - Date formats are tried in order: ISO 8601, then `DD/MM/YYYY`.
//! - Source records are only borrowed, never mutated.

use crate::model::activity::{ActivityRecord, SourceRef};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Instant substituted for dates that cannot be parsed.
pub const EPOCH_SENTINEL: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid day/month/year regex")
});

const ISO_OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%#z",
];

const ISO_LOCAL_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Normalizes one source record into the canonical activity shape.
pub fn normalize(source: SourceRef<'_>) -> ActivityRecord<'_> {
    match source {
        SourceRef::Filing(record) => ActivityRecord {
            id: record.id.clone(),
            source_type: source.source_type(),
            sub_type: record.filing_type.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            effective_date: resolve_logged(source, record.date.as_str()),
            raw_date_text: record.date.clone(),
            expiration_date: resolve_optional_date(record.expiration_date.as_deref()),
            link: record.link.clone(),
            actor: record.party.clone(),
            completed: Some(record.completed),
            source,
        },
        SourceRef::Notification(record) => ActivityRecord {
            id: record.id.clone(),
            source_type: source.source_type(),
            sub_type: record.channel.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            effective_date: resolve_logged(source, record.date.as_str()),
            raw_date_text: record.date.clone(),
            expiration_date: resolve_optional_date(record.expiration_date.as_deref()),
            link: record.link.clone(),
            actor: record.recipient.clone(),
            completed: None,
            source,
        },
        SourceRef::Event(record) => ActivityRecord {
            id: record.id.clone(),
            source_type: source.source_type(),
            sub_type: record.kind.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            effective_date: resolve_logged(source, record.start.as_str()),
            raw_date_text: record.start.clone(),
            expiration_date: resolve_optional_date(record.deadline.as_deref()),
            link: record.link.clone(),
            actor: record.organizer.clone(),
            completed: None,
            source,
        },
    }
}

/// Parses a date using the supported formats, first match wins.
///
/// Date-only inputs resolve to midnight UTC. Local ISO date-times without an
/// offset are read as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    parse_iso8601(text).or_else(|| parse_day_month_year(text))
}

/// Resolves a mandatory date, degrading to `EPOCH_SENTINEL`.
pub fn resolve_date(raw: &str) -> DateTime<Utc> {
    parse_date(raw).unwrap_or(EPOCH_SENTINEL)
}

/// Resolves an optional date.
///
/// Absent or blank input stays `None`; present but unparsable text degrades
/// to `EPOCH_SENTINEL` like mandatory dates do.
pub fn resolve_optional_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    Some(resolve_date(text))
}

fn resolve_logged(source: SourceRef<'_>, raw: &str) -> DateTime<Utc> {
    match parse_date(raw) {
        Some(value) => value,
        None => {
            debug!(
                "event=date_degraded module=feed source={} raw_len={}",
                source.source_type().as_str(),
                raw.len()
            );
            EPOCH_SENTINEL
        }
    }
}

fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.with_timezone(&Utc));
    }

    for format in ISO_OFFSET_FORMATS {
        if let Ok(value) = DateTime::parse_from_str(text, format) {
            return Some(value.with_timezone(&Utc));
        }
    }

    // A trailing `Z` designates UTC, which is how local layouts are read anyway.
    let local = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix('z'))
        .unwrap_or(text);
    for format in ISO_LOCAL_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(local, format) {
            return Some(value.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(midnight_utc)
}

fn parse_day_month_year(text: &str) -> Option<DateTime<Utc>> {
    let caps = DAY_MONTH_YEAR_RE.captures(text)?;
    let day = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let month = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).and_then(midnight_utc)
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|value| value.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{parse_date, resolve_optional_date, EPOCH_SENTINEL};
    use chrono::{TimeZone, Utc};

    #[test]
    fn iso_offset_is_converted_to_utc() {
        let parsed = parse_date("2024-03-10T12:30:00-03:00").expect("rfc3339 should parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap());
    }

    #[test]
    fn iso_date_and_local_datetime_parse() {
        assert_eq!(
            parse_date("2024-03-10"),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-03-10T08:15"),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn iso_minute_precision_with_zone_parses() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap();
        assert_eq!(parse_date("2024-03-10T12:30Z"), Some(expected));
        assert_eq!(parse_date("2024-03-10T15:30+03:00"), Some(expected));
    }

    #[test]
    fn day_month_year_is_not_read_as_month_day() {
        assert_eq!(
            parse_date("05/04/2024"),
            Some(Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date("31/31/9999"), None);
        assert_eq!(parse_date("29/02/2023"), None);
    }

    #[test]
    fn optional_date_distinguishes_absent_from_malformed() {
        assert_eq!(resolve_optional_date(None), None);
        assert_eq!(resolve_optional_date(Some("  ")), None);
        assert_eq!(resolve_optional_date(Some("soon")), Some(EPOCH_SENTINEL));
    }
}
