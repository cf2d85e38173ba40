//! Command-line entry point for the activity feed core.
//!
//! # Responsibility
//! - Load folder records from JSON files and print feed views or exports.
//! - Keep output deterministic for quick local checks.

use anyhow::{bail, Context, Result};
use casefeed_core::{
    aggregate, init_logging, paginate, parse_columns, serialize_to_delimited_text,
    ActivityRecord, EventRecord, ExportColumn, FeedFilter, FeedSources, FilingFilter,
    FilingRecord, FilingSortField, InMemorySource, NotificationRecord, PaginationController,
    SortDirection, SourceType,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "casefeed", version, about = "Case folder activity feed")]
struct Cli {
    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[arg(long, global = true, default_value = casefeed_core::default_log_level())]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merged activity feed.
    Feed {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        view: FeedView,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Print the merged activity feed as delimited text.
    Export {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        view: FeedView,
        /// Comma-separated column names, e.g. `effectiveDate,title`.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Print one server-style page of filings.
    Filings {
        #[arg(long)]
        filings: PathBuf,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,
        #[arg(long)]
        asc: bool,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "type")]
        filing_type: Option<String>,
    },
}

#[derive(Debug, Args)]
struct Inputs {
    #[arg(long)]
    filings: Option<PathBuf>,
    #[arg(long)]
    notifications: Option<PathBuf>,
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FeedView {
    /// Comma-separated source types to show (filing, notification, event).
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,
    #[arg(long, default_value = "")]
    search: String,
    /// Oldest first instead of newest first.
    #[arg(long)]
    asc: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Title,
    Type,
}

impl From<SortArg> for FilingSortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Date => Self::Date,
            SortArg::Title => Self::Title,
            SortArg::Type => Self::Type,
        }
    }
}

struct LoadedInputs {
    filings: Vec<FilingRecord>,
    notifications: Vec<NotificationRecord>,
    events: Vec<EventRecord>,
}

impl LoadedInputs {
    fn read(inputs: &Inputs) -> Result<Self> {
        Ok(Self {
            filings: read_optional(inputs.filings.as_deref())?,
            notifications: read_optional(inputs.notifications.as_deref())?,
            events: read_optional(inputs.events.as_deref())?,
        })
    }

    fn sources(&self) -> FeedSources<'_> {
        FeedSources {
            filings: &self.filings,
            notifications: &self.notifications,
            events: &self.events,
        }
    }
}

impl FeedView {
    fn filter(&self) -> Result<FeedFilter> {
        if self.only.is_empty() {
            return Ok(FeedFilter::all());
        }
        let mut types = Vec::with_capacity(self.only.len());
        for name in &self.only {
            match SourceType::parse(name) {
                Some(source_type) => types.push(source_type),
                None => bail!("unknown source type `{name}`"),
            }
        }
        Ok(FeedFilter::only(types))
    }

    fn direction(&self) -> SortDirection {
        if self.asc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Feed {
            inputs,
            view,
            page,
            page_size,
        } => {
            let loaded = LoadedInputs::read(&inputs)?;
            let feed = aggregate(
                loaded.sources(),
                &view.filter()?,
                view.search.trim(),
                view.direction(),
            );
            let feed_page = paginate(&feed, page, page_size);
            for record in feed_page.items {
                println!("{}", format_record(record));
            }
            println!(
                "-- page {}/{} ({} records)",
                feed_page.meta.page, feed_page.meta.total_pages, feed_page.meta.total
            );
        }
        Command::Export {
            inputs,
            view,
            columns,
        } => {
            let loaded = LoadedInputs::read(&inputs)?;
            let feed = aggregate(
                loaded.sources(),
                &view.filter()?,
                view.search.trim(),
                view.direction(),
            );
            let columns = if columns.is_empty() {
                ExportColumn::DEFAULT.to_vec()
            } else {
                parse_columns(columns.iter().map(String::as_str))
            };
            if columns.is_empty() {
                bail!("no known export columns given");
            }
            println!("{}", serialize_to_delimited_text(&feed, &columns));
        }
        Command::Filings {
            filings,
            page,
            page_size,
            sort,
            asc,
            search,
            filing_type,
        } => {
            let records: Vec<FilingRecord> = read_json(&filings)?;
            let source = InMemorySource::new(uuid::Uuid::new_v4()).with_filings(records);
            let mut controller = PaginationController::new(source.folder_id(), page_size);

            let direction = if asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let ticket = controller.set_sort(sort.into(), direction);
            controller.fetch_with(&source, ticket);
            let ticket = controller.set_filter(FilingFilter {
                type_filter: filing_type,
                date_range: None,
            });
            controller.fetch_with(&source, ticket);
            let ticket = controller.set_search(search.trim());
            controller.fetch_with(&source, ticket);
            if page != 1 {
                let ticket = controller.set_page(page)?;
                controller.fetch_with(&source, ticket);
            }
            if let Some(err) = controller.last_error() {
                bail!("filings fetch failed: {err}");
            }

            for filing in controller.items() {
                let marker = if filing.has_link() { "*" } else { " " };
                println!("{marker} {}\t{}\t{}", filing.date, filing.filing_type, filing.title);
            }
            let meta = controller.meta();
            println!(
                "-- page {}/{} ({} filings)",
                meta.page, meta.total_pages, meta.total
            );
        }
    }

    info!("event=cli_done module=cli status=ok");
    Ok(())
}

fn format_record(record: &ActivityRecord<'_>) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.effective_date.format("%Y-%m-%d"),
        record.source_type.as_str(),
        record.sub_type,
        record.title
    )
}

fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in `{}`", path.display()))
}
