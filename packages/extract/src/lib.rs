#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record extraction from police report PDFs.
//!
//! Some police departments only publish their daily incident summaries as
//! PDF reports. This crate recovers structured [`IncidentRecord`]s from
//! those PDFs using pure-Rust text extraction ([`pdf_extract`], which keeps
//! the page's column spacing) combined with two heuristics:
//!
//! - a line may concatenate several records edge-to-edge, but every record
//!   begins with a date-time stamp, so stamps are the row delimiter
//!   ([`segment`]);
//! - table columns render as wide whitespace runs while words inside a
//!   field keep their single spaces, so runs of four or more whitespace
//!   characters are the column delimiter ([`fields`]).
//!
//! Both heuristics are best-effort: lines without a stamp and segments that
//! do not split into exactly five columns contribute no records and are
//! only counted in [`ExtractionStats`]. The primary entry point is
//! [`extract_report`]; [`extract_report_text`] is the pure text core.

pub mod fields;
pub mod segment;

use std::path::Path;

use incident_map_incident_models::IncidentRecord;
use regex::Regex;
use serde::Serialize;

/// Date-time stamp that introduces every report row, e.g. `1/2/2024 5:30`
/// (month, day, and hour are 1-2 digits, not zero-padded).
pub const TIMESTAMP_PATTERN: &str = r"\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}";

/// Minimum whitespace-run length treated as a column boundary.
///
/// Four separates column gaps from natural word spacing in the target
/// report family; smaller over-splits multi-word location/nature text,
/// larger under-splits narrow columns.
pub const MIN_COLUMN_GAP: usize = 4;

/// Boilerplate lines stripped from the top of the concatenated page text.
pub const HEADER_LINES: usize = 3;

/// Boilerplate lines stripped from the bottom of the concatenated page text.
pub const FOOTER_LINES: usize = 1;

/// Errors specific to report extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document could not be opened or yielded no extractable text.
    #[error("failed to read document: {0}")]
    Document(String),

    /// A configured pattern failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Tunables of the extraction heuristic for one report family.
///
/// The defaults describe the target daily-incident-summary layout; a
/// deviating corpus can retune the stamp pattern, the column-gap width, and
/// the positional boilerplate trim without touching the pipeline.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    timestamp_re: Regex,
    column_gap_re: Regex,
    header_lines: usize,
    footer_lines: usize,
}

impl ReportLayout {
    /// Creates a layout with the given row-stamp pattern and column-gap
    /// width, using the default boilerplate trim counts.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Regex`] if `timestamp_pattern` fails to
    /// compile.
    pub fn new(timestamp_pattern: &str, min_column_gap: usize) -> Result<Self, ExtractError> {
        Ok(Self {
            timestamp_re: Regex::new(timestamp_pattern)?,
            column_gap_re: Regex::new(&format!(r"\s{{{min_column_gap},}}"))?,
            header_lines: HEADER_LINES,
            footer_lines: FOOTER_LINES,
        })
    }

    /// Overrides the number of boilerplate lines trimmed from the top and
    /// bottom of the concatenated page text.
    #[must_use]
    pub const fn with_boilerplate(mut self, header_lines: usize, footer_lines: usize) -> Self {
        self.header_lines = header_lines;
        self.footer_lines = footer_lines;
        self
    }

    /// The compiled row-stamp pattern.
    #[must_use]
    pub const fn timestamp_re(&self) -> &Regex {
        &self.timestamp_re
    }

    /// The compiled column-gap pattern.
    #[must_use]
    pub const fn column_gap_re(&self) -> &Regex {
        &self.column_gap_re
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::new(TIMESTAMP_PATTERN, MIN_COLUMN_GAP).unwrap_or_else(|_| unreachable!())
    }
}

/// Counters describing how much of a document the heuristics accepted.
///
/// Dropped lines and segments are routine noise-filtering outcomes, never
/// errors; these counters make the filtering observable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Non-blank lines scanned after the boilerplate trim.
    pub lines: u64,
    /// Lines with no embedded date-time stamp (contributed nothing).
    pub lines_without_timestamp: u64,
    /// Record segments found across all lines.
    pub segments: u64,
    /// Segments whose column split did not yield exactly five fields.
    pub rejected_segments: u64,
}

impl ExtractionStats {
    /// Adds another document's counters onto this one.
    pub const fn merge(&mut self, other: Self) {
        self.lines += other.lines;
        self.lines_without_timestamp += other.lines_without_timestamp;
        self.segments += other.segments;
        self.rejected_segments += other.rejected_segments;
    }
}

/// The outcome of extracting one document.
#[derive(Debug, Default, Clone)]
pub struct Extraction {
    /// Validated records in line order, then intra-line segment order.
    pub records: Vec<IncidentRecord>,
    /// Diagnostics for the lines/segments the heuristics dropped.
    pub stats: ExtractionStats,
}

/// Extracts incident records from the PDF at `path` using the default
/// [`ReportLayout`], returning the records only.
///
/// # Errors
///
/// Returns [`ExtractError::Document`] if the PDF cannot be opened or its
/// text cannot be extracted.
pub fn extract_incidents(path: impl AsRef<Path>) -> Result<Vec<IncidentRecord>, ExtractError> {
    Ok(extract_report(path, &ReportLayout::default())?.records)
}

/// Extracts incident records and diagnostics from the PDF at `path`.
///
/// # Errors
///
/// Returns [`ExtractError::Document`] if the PDF cannot be opened or its
/// text cannot be extracted. A readable document with no recoverable rows
/// yields an empty [`Extraction`], not an error.
pub fn extract_report(
    path: impl AsRef<Path>,
    layout: &ReportLayout,
) -> Result<Extraction, ExtractError> {
    let text = pdf_extract::extract_text(path.as_ref())
        .map_err(|e| ExtractError::Document(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} characters of text from {}",
        text.len(),
        path.as_ref().display()
    );

    Ok(extract_report_text(&text, layout))
}

/// Extracts incident records and diagnostics from in-memory PDF bytes.
///
/// # Errors
///
/// Returns [`ExtractError::Document`] if the bytes are not a readable PDF.
pub fn extract_report_from_mem(
    bytes: &[u8],
    layout: &ReportLayout,
) -> Result<Extraction, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Document(format!("failed to extract text from PDF: {e}")))?;

    Ok(extract_report_text(&text, layout))
}

/// The pure text core of the pipeline.
///
/// `content` is the layout-preserved page text in page order (one blob, as
/// produced by [`pdf_extract`]). Strips the positional boilerplate, drops
/// blank lines, and runs every remaining line through
/// segmenter → tokenizer → validator, accumulating records in line order
/// then intra-line segment order.
#[must_use]
pub fn extract_report_text(content: &str, layout: &ReportLayout) -> Extraction {
    let lines: Vec<&str> = content.lines().collect();
    let trim = layout.header_lines + layout.footer_lines;

    let body: &[&str] = if lines.len() > trim {
        &lines[layout.header_lines..lines.len() - layout.footer_lines]
    } else {
        &[]
    };

    let mut extraction = Extraction::default();

    for line in body {
        if line.trim().is_empty() {
            continue;
        }
        extraction.stats.lines += 1;

        let segments = segment::split_records(&layout.timestamp_re, line);
        if segments.is_empty() {
            extraction.stats.lines_without_timestamp += 1;
            continue;
        }

        for seg in segments {
            extraction.stats.segments += 1;

            let columns: Vec<String> = fields::split_columns(&layout.column_gap_re, seg)
                .into_iter()
                .map(str::to_owned)
                .collect();

            match IncidentRecord::from_fields(columns) {
                Some(record) => extraction.records.push(record),
                None => extraction.stats.rejected_segments += 1,
            }
        }
    }

    log::debug!(
        "Recovered {} records from {} lines ({} segments, {} rejected)",
        extraction.records.len(),
        extraction.stats.lines,
        extraction.stats.segments,
        extraction.stats.rejected_segments
    );

    extraction
}
