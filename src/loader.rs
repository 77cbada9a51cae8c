//! Corpus loader: reads a directory of message files and filters by date

use crate::config::AnalysisConfig;
use crate::error::LoadError;
use crate::parser::parse_message;
use crate::types::{Message, ParseOutcome};
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Inclusive UTC date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = LoadError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, LoadError> {
        if start > end {
            return Err(LoadError::InvalidRange(format!("{start} is after {end}")));
        }
        Ok(Self { start, end })
    }

    /// From the start of `first` to the last instant of `last`
    pub fn whole_days(first: NaiveDate, last: NaiveDate) -> Result<Self, LoadError> {
        let start = first
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| LoadError::InvalidRange(format!("no start of day for {first}")))?
            .and_utc();
        let end = last
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| LoadError::InvalidRange(format!("no end of day for {last}")))?
            .and_utc();
        Self::new(start, end)
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Per-run loading counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Files matching the mail extension
    pub candidates: usize,
    pub parsed: usize,
    /// Parsed with some fields defaulted
    pub degraded: usize,
    pub unreadable: usize,
    pub io_failures: usize,
    /// Messages dropped for lacking a usable date
    pub undated: usize,
    pub out_of_range: usize,
    pub retained: usize,
}

/// Messages retained for one run, ascending by date then file name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub messages: Vec<Message>,
    pub report: LoadReport,
}

impl Corpus {
    #[must_use]
    pub fn new(mut messages: Vec<Message>) -> Self {
        sort_messages(&mut messages);
        let report = LoadReport {
            retained: messages.len(),
            ..LoadReport::default()
        };
        Self { messages, report }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Dates of the first and last message
    #[must_use]
    pub fn date_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.messages.first()?.date?;
        let last = self.messages.last()?.date?;
        Some((first, last))
    }
}

enum FileResult {
    Io,
    Parsed(ParseOutcome),
}

/// Load every mail file in `directory` dated within `range`.
///
/// A missing or non-directory path is an error. Per-file failures are counted
/// in the report and skipped. An empty corpus is a valid result.
pub fn load_corpus(
    directory: &Path,
    range: &DateRange,
    config: &AnalysisConfig,
) -> Result<Corpus, LoadError> {
    let files = list_mail_files(directory, &config.mail_extension)?;
    info!(
        "Found {} {} files in {}",
        files.len(),
        config.mail_extension,
        directory.display()
    );

    let results: Vec<FileResult> = if config.parallel {
        files.par_iter().map(|path| read_file(path)).collect()
    } else {
        files.iter().map(|path| read_file(path)).collect()
    };

    let mut report = LoadReport {
        candidates: files.len(),
        ..LoadReport::default()
    };
    let mut messages = Vec::new();

    for result in results {
        let outcome = match result {
            FileResult::Io => {
                report.io_failures += 1;
                continue;
            }
            FileResult::Parsed(outcome) => outcome,
        };

        match &outcome {
            ParseOutcome::Parsed(_) => report.parsed += 1,
            ParseOutcome::Degraded { .. } => report.degraded += 1,
            ParseOutcome::Unreadable(_) => report.unreadable += 1,
        }

        let Some(message) = outcome.into_message() else {
            continue;
        };

        match message.date {
            None => {
                debug!(source = %message.source, "Dropping undated message");
                report.undated += 1;
            }
            Some(date) if !range.contains(date) => {
                debug!(source = %message.source, %date, "Message outside date range");
                report.out_of_range += 1;
            }
            Some(_) => messages.push(message),
        }
    }

    sort_messages(&mut messages);
    report.retained = messages.len();

    info!(
        retained = report.retained,
        undated = report.undated,
        out_of_range = report.out_of_range,
        failures = report.io_failures + report.unreadable,
        "Loaded corpus"
    );

    Ok(Corpus { messages, report })
}

fn list_mail_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    if !directory.exists() {
        return Err(LoadError::NotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(LoadError::NotADirectory(directory.to_path_buf()));
    }

    let entries = fs::read_dir(directory).map_err(|source| LoadError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(extension))
        })
        .collect();
    files.sort();

    Ok(files)
}

fn read_file(path: &Path) -> FileResult {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match fs::read(path) {
        Ok(raw) => FileResult::Parsed(parse_message(&name, &raw)),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "Failed to read message file");
            FileResult::Io
        }
    }
}

/// Ascending by date, ties broken by file name
fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.source.cmp(&b.source)));
}
