//! Line segmentation on embedded date-time stamps.
//!
//! The layout-preserved page text sometimes concatenates several records on
//! one line with no reliable visual gap between them, but every record
//! begins with a date-time stamp. The stamp is therefore the only reliable
//! row delimiter: each match's start offset opens a segment that runs to
//! the next match (or end of line).

use regex::Regex;

/// Splits one line into per-record segments at date-time stamp offsets.
///
/// A line with no stamp yields no segments — that is routine for
/// continuation or boilerplate text, not an error. Segments are trimmed;
/// any that trim to empty are dropped.
#[must_use]
pub fn split_records<'a>(timestamp_re: &Regex, line: &'a str) -> Vec<&'a str> {
    let starts: Vec<usize> = timestamp_re.find_iter(line).map(|m| m.start()).collect();

    let mut segments = Vec::with_capacity(starts.len());

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(line.len());
        let seg = line[start..end].trim();
        if !seg.is_empty() {
            segments.push(seg);
        }
    }

    segments
}
