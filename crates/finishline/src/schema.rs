// ABOUTME: Canonical data model for race results: Format, result rows, ProcessingRecord.
// ABOUTME: Fixes the column schema and ordering every extractor must emit.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A known publishing template for race-results pages.
///
/// Closed set: extending it means adding a new detector/extractor pair to
/// the registry, never touching the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// `<pre>`-based results inside a `meetResultsBody` container.
    PreBlock,
    /// Legacy `table.eventTable` markup with labelled header cells.
    LegacyEventTable,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::PreBlock => "pre_block",
            Format::LegacyEventTable => "legacy_event_table",
        };
        write!(f, "{}", s)
    }
}

/// Column order of the individual results table. Stable across calls so
/// downstream consumers can use positional or named access interchangeably.
pub const INDIVIDUAL_COLUMNS: [&str; 7] =
    ["place", "video", "athlete", "grade", "team", "finish", "point"];

/// Column order of the team results table.
pub const TEAM_COLUMNS: [&str; 5] = ["place", "team", "point", "wind", "heat"];

/// Column order of the metadata table.
pub const RECORD_COLUMNS: [&str; 9] = [
    "source_id",
    "source_url",
    "outcome",
    "format",
    "confidence",
    "row_count",
    "dropped_rows",
    "error",
    "processed_at",
];

/// One individual finisher. Every extractor emits all seven canonical
/// columns; data the source format lacks is `None`, never omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndividualRow {
    pub place: u32,
    pub video: Option<String>,
    pub athlete: String,
    pub grade: Option<u32>,
    pub team: String,
    pub finish: String,
    pub point: Option<f64>,
    /// Auxiliary `<column>_url` values harvested from in-cell hyperlinks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

/// One team score line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamRow {
    pub place: u32,
    pub team: String,
    pub point: Option<f64>,
    pub wind: Option<String>,
    pub heat: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

static RACE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"results/(\d+)/").unwrap());

/// Identity of one source page: the race id plus the originating URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSource {
    pub id: String,
    pub url: String,
}

impl PageSource {
    /// Derives the race id from a results URL, falling back to the last
    /// non-empty path segment when the URL does not carry a `results/<n>/`
    /// component.
    pub fn from_url(url: &str) -> Self {
        let id = match RACE_ID_RE.captures(url) {
            Some(caps) => caps[1].to_string(),
            None => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(url)
                .to_string(),
        };
        Self {
            id,
            url: url.to_string(),
        }
    }
}

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A format won classification and its extractor ran.
    Extracted,
    /// No format reached the acceptance threshold; zero rows produced.
    Skipped,
    /// Retrieval or processing failed; see the record's error field.
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Extracted => "extracted",
            Outcome::Skipped => "skipped: low confidence",
            Outcome::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Audit entry summarizing the outcome of processing one page.
/// Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRecord {
    pub source_id: String,
    pub source_url: String,
    pub outcome: Outcome,
    pub format: Option<Format>,
    pub confidence: f64,
    pub row_count: usize,
    /// Lines or rows dropped by best-effort parsing, surfaced for
    /// observability rather than hidden.
    pub dropped_rows: usize,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl ProcessingRecord {
    /// Record for a page whose winning format was extracted.
    pub fn extracted(
        source: &PageSource,
        format: Format,
        confidence: f64,
        row_count: usize,
        dropped_rows: usize,
    ) -> Self {
        Self {
            source_id: source.id.clone(),
            source_url: source.url.clone(),
            outcome: Outcome::Extracted,
            format: Some(format),
            confidence,
            row_count,
            dropped_rows,
            error: None,
            processed_at: Utc::now(),
        }
    }

    /// Record for a page no format claimed with enough confidence. The
    /// observed confidence is kept for diagnostics.
    pub fn skipped(source: &PageSource, format: Option<Format>, confidence: f64) -> Self {
        Self {
            source_id: source.id.clone(),
            source_url: source.url.clone(),
            outcome: Outcome::Skipped,
            format,
            confidence,
            row_count: 0,
            dropped_rows: 0,
            error: None,
            processed_at: Utc::now(),
        }
    }

    /// Record for a page whose retrieval or processing failed.
    pub fn failed(source: &PageSource, error: impl Into<String>) -> Self {
        Self {
            source_id: source.id.clone(),
            source_url: source.url.clone(),
            outcome: Outcome::Failed,
            format: None,
            confidence: 0.0,
            row_count: 0,
            dropped_rows: 0,
            error: Some(error.into()),
            processed_at: Utc::now(),
        }
    }
}
