#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session-scoped accumulation table for extracted incident records.
//!
//! Every processed document appends its records here in arrival order; the
//! table is append-only for the life of a session and is cleared only by an
//! explicit [`SessionTable::clear`]. One shared handle (e.g. behind an
//! `Arc` in server state) serves all workers — appends serialize on the
//! interior lock, reads take cheap snapshots.
//!
//! Alongside the records the table accumulates the per-document
//! [`ExtractionStats`], so callers can observe how much input the
//! extraction heuristics dropped without any extraction call ever failing
//! on routine noise.

use std::sync::RwLock;

use incident_map_extract::{Extraction, ExtractionStats};
use incident_map_incident_models::IncidentRecord;
use serde::Serialize;

/// Cumulative counters for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Documents absorbed into the table.
    pub documents: u64,
    /// Records currently held.
    pub records: u64,
    /// Extraction diagnostics summed across all absorbed documents.
    pub extraction: ExtractionStats,
}

/// Append-only, order-preserving store of extracted records.
#[derive(Debug, Default)]
pub struct SessionTable {
    records: RwLock<Vec<IncidentRecord>>,
    stats: RwLock<SessionStats>,
}

impl SessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records, preserving their order after all existing rows.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    pub fn append(&self, records: Vec<IncidentRecord>) {
        let added = records.len() as u64;

        self.records
            .write()
            .expect("session table lock poisoned")
            .extend(records);
        self.stats
            .write()
            .expect("session stats lock poisoned")
            .records += added;
    }

    /// Absorbs one document's extraction outcome: appends its records and
    /// folds its diagnostics into the session totals.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    pub fn absorb(&self, extraction: Extraction) {
        {
            let mut stats = self.stats.write().expect("session stats lock poisoned");
            stats.documents += 1;
            stats.extraction.merge(extraction.stats);
        }
        self.append(extraction.records);
    }

    /// Returns a copy of all accumulated records in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Vec<IncidentRecord> {
        self.records
            .read()
            .expect("session table lock poisoned")
            .clone()
    }

    /// Number of accumulated records.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .expect("session table lock poisoned")
            .len()
    }

    /// Whether the table holds no records.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cumulative session counters.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        *self.stats.read().expect("session stats lock poisoned")
    }

    /// Empties the table and resets all counters.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned.
    pub fn clear(&self) {
        self.records
            .write()
            .expect("session table lock poisoned")
            .clear();
        *self.stats.write().expect("session stats lock poisoned") = SessionStats::default();

        log::info!("Session table cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_map_extract::{ExtractionStats, ReportLayout, extract_report_text};

    fn record(number: &str) -> IncidentRecord {
        IncidentRecord {
            date_time: "1/2/2024 5:30".to_owned(),
            incident_number: number.to_owned(),
            location: "MAIN ST".to_owned(),
            nature: "Theft".to_owned(),
            incident_type: "Larceny".to_owned(),
        }
    }

    #[test]
    fn append_preserves_arrival_order() {
        let table = SessionTable::new();
        table.append(vec![record("1"), record("2")]);
        table.append(vec![record("3")]);

        let numbers: Vec<String> = table
            .snapshot()
            .into_iter()
            .map(|r| r.incident_number)
            .collect();
        assert_eq!(numbers, ["1", "2", "3"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn absorb_accumulates_records_and_diagnostics() {
        let table = SessionTable::new();

        let extraction = Extraction {
            records: vec![record("1")],
            stats: ExtractionStats {
                lines: 3,
                lines_without_timestamp: 1,
                segments: 2,
                rejected_segments: 1,
            },
        };
        table.absorb(extraction.clone());
        table.absorb(extraction);

        let stats = table.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.extraction.lines, 6);
        assert_eq!(stats.extraction.rejected_segments, 2);
    }

    #[test]
    fn clear_resets_records_and_counters() {
        let table = SessionTable::new();
        table.append(vec![record("1")]);
        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.stats(), SessionStats::default());
    }

    #[test]
    fn absorbs_real_extraction_output() {
        let content = "h1\nh2\nh3\n\
                       1/2/2024 5:30    123    Main St    Theft    Larceny\n\
                       footer\n";
        let extraction = extract_report_text(content, &ReportLayout::default());

        let table = SessionTable::new();
        table.absorb(extraction);

        assert_eq!(table.len(), 1);
        assert_eq!(table.stats().documents, 1);
    }
}
