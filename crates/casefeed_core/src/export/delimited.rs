//! Delimited-text export of activity records.
//!
//! # Responsibility
//! - Render chosen `ActivityRecord` columns as delimited text with a header.
//!
//! # Invariants
//! - Fields containing the delimiter, quotes or line breaks are quoted, and
//!   embedded quotes are doubled, so the output splits back losslessly.
//! - Rows are separated by `\n`; no trailing newline.
//! - Pure transform: no I/O.

use crate::model::activity::ActivityRecord;
use chrono::{DateTime, SecondsFormat, Utc};

/// Delimiter used when the caller does not choose one.
pub const DEFAULT_DELIMITER: char = ',';

/// Exportable activity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Id,
    SourceType,
    SubType,
    Title,
    Description,
    EffectiveDate,
    RawDateText,
    ExpirationDate,
    Link,
    Actor,
    Completed,
}

impl ExportColumn {
    /// Column set used by the feed's default export.
    pub const DEFAULT: [ExportColumn; 6] = [
        Self::EffectiveDate,
        Self::SourceType,
        Self::SubType,
        Self::Title,
        Self::Description,
        Self::Actor,
    ];

    /// Header name, matching the record's camelCase field name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::SourceType => "sourceType",
            Self::SubType => "subType",
            Self::Title => "title",
            Self::Description => "description",
            Self::EffectiveDate => "effectiveDate",
            Self::RawDateText => "rawDateText",
            Self::ExpirationDate => "expirationDate",
            Self::Link => "link",
            Self::Actor => "actor",
            Self::Completed => "completed",
        }
    }

    /// Parses a header name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim();
        ALL_COLUMNS
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(wanted))
    }

    fn value(self, record: &ActivityRecord<'_>) -> String {
        match self {
            Self::Id => record.id.clone(),
            Self::SourceType => record.source_type.as_str().to_string(),
            Self::SubType => record.sub_type.clone(),
            Self::Title => record.title.clone(),
            Self::Description => record.description.clone().unwrap_or_default(),
            Self::EffectiveDate => format_instant(record.effective_date),
            Self::RawDateText => record.raw_date_text.clone(),
            Self::ExpirationDate => record.expiration_date.map(format_instant).unwrap_or_default(),
            Self::Link => record.link.clone().unwrap_or_default(),
            Self::Actor => record.actor.clone().unwrap_or_default(),
            Self::Completed => record
                .completed
                .map(|value| value.to_string())
                .unwrap_or_default(),
        }
    }
}

const ALL_COLUMNS: [ExportColumn; 11] = [
    ExportColumn::Id,
    ExportColumn::SourceType,
    ExportColumn::SubType,
    ExportColumn::Title,
    ExportColumn::Description,
    ExportColumn::EffectiveDate,
    ExportColumn::RawDateText,
    ExportColumn::ExpirationDate,
    ExportColumn::Link,
    ExportColumn::Actor,
    ExportColumn::Completed,
];

/// Parses column names, silently skipping unknown ones.
pub fn parse_columns<'s>(names: impl IntoIterator<Item = &'s str>) -> Vec<ExportColumn> {
    names.into_iter().filter_map(ExportColumn::parse).collect()
}

/// Serializes records with a header row using `,` as delimiter.
pub fn serialize_to_delimited_text(
    records: &[ActivityRecord<'_>],
    columns: &[ExportColumn],
) -> String {
    serialize_with_delimiter(records, columns, DEFAULT_DELIMITER)
}

/// Serializes records with a header row using `delimiter`.
pub fn serialize_with_delimiter(
    records: &[ActivityRecord<'_>],
    columns: &[ExportColumn],
    delimiter: char,
) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(
        columns.iter().map(|column| column.key().to_string()),
        delimiter,
    ));
    for record in records {
        lines.push(join_row(
            columns.iter().map(|column| column.value(record)),
            delimiter,
        ));
    }
    lines.join("\n")
}

fn join_row(fields: impl Iterator<Item = String>, delimiter: char) -> String {
    let separator = delimiter.to_string();
    fields
        .map(|field| escape_field(field.as_str(), delimiter))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

fn escape_field(raw: &str, delimiter: char) -> String {
    let needs_quotes = raw.contains(delimiter) || raw.contains(['"', '\n', '\r']);
    if !needs_quotes {
        return raw.to_string();
    }
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn format_instant(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
