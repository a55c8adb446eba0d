#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The incident record type shared across the incident-map system.
//!
//! Every extracted report row becomes one [`IncidentRecord`] with the five
//! columns the source report family publishes, in reading order. Fields are
//! stored as the raw strings recovered from the page text — in particular
//! the timestamp is **not** parsed at extraction time; downstream consumers
//! call [`IncidentRecord::occurred_at`] and treat unparseable values as
//! absent.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of columns a report row must yield to become a record.
///
/// The report family prints exactly five columns; a segment splitting into
/// any other count is extraction noise and is dropped.
pub const EXPECTED_FIELD_COUNT: usize = 5;

/// Timestamp format printed in the first report column, e.g.
/// `1/2/2024 5:30` (month, day, and hour are not zero-padded).
pub const REPORT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// A single incident row recovered from a report.
///
/// Serializes with the report's own column vocabulary (`DateTime`,
/// `IncidentNumber`, `Location`, `Nature`, `IncidentType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncidentRecord {
    /// Raw matched timestamp token (`M/D/YYYY H:MM`).
    pub date_time: String,
    /// Agency-assigned incident number.
    pub incident_number: String,
    /// Free-text location as printed in the report.
    pub location: String,
    /// Incident category/description (e.g., "Larceny").
    pub nature: String,
    /// Incident type code column.
    pub incident_type: String,
}

impl IncidentRecord {
    /// Builds a record from tokenized columns, mapping positionally.
    ///
    /// Returns `None` unless exactly [`EXPECTED_FIELD_COUNT`] fields are
    /// present — partial or over-split segments are routine extraction
    /// noise, not errors.
    #[must_use]
    pub fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [date_time, incident_number, location, nature, incident_type]: [String;
            EXPECTED_FIELD_COUNT] = fields.try_into().ok()?;

        Some(Self {
            date_time,
            incident_number,
            location,
            nature,
            incident_type,
        })
    }

    /// Parses the raw timestamp leniently.
    ///
    /// Returns `None` when the stored value does not parse as
    /// [`REPORT_TIMESTAMP_FORMAT`]; an implausible date never invalidates
    /// the record itself.
    #[must_use]
    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        parse_report_timestamp(&self.date_time)
    }
}

/// Parses a report timestamp string (`M/D/YYYY H:MM`, fields not
/// zero-padded). Returns `None` if missing or unparseable.
#[must_use]
pub fn parse_report_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), REPORT_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn builds_record_from_five_fields() {
        let record = IncidentRecord::from_fields(fields(&[
            "1/2/2024 5:30",
            "2024-00001234",
            "1600 MAIN ST",
            "Larceny",
            "911 Call",
        ]))
        .unwrap();

        assert_eq!(record.date_time, "1/2/2024 5:30");
        assert_eq!(record.incident_number, "2024-00001234");
        assert_eq!(record.location, "1600 MAIN ST");
        assert_eq!(record.nature, "Larceny");
        assert_eq!(record.incident_type, "911 Call");
    }

    #[test]
    fn rejects_too_few_fields() {
        assert!(IncidentRecord::from_fields(fields(&["1/2/2024 5:30", "123", "MAIN ST"])).is_none());
    }

    #[test]
    fn rejects_too_many_fields() {
        assert!(
            IncidentRecord::from_fields(fields(&["a", "b", "c", "d", "e", "f"])).is_none()
        );
    }

    #[test]
    fn serializes_with_report_column_names() {
        let record = IncidentRecord::from_fields(fields(&[
            "1/2/2024 5:30",
            "123",
            "MAIN ST",
            "Theft",
            "Larceny",
        ]))
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["DateTime"], "1/2/2024 5:30");
        assert_eq!(json["IncidentNumber"], "123");
        assert_eq!(json["Location"], "MAIN ST");
        assert_eq!(json["Nature"], "Theft");
        assert_eq!(json["IncidentType"], "Larceny");
    }

    #[test]
    fn parses_unpadded_timestamp() {
        let dt = parse_report_timestamp("1/2/2024 5:30").unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 05:30:00");
    }

    #[test]
    fn parses_padded_timestamp() {
        let dt = parse_report_timestamp("12/25/2024 23:59").unwrap();
        assert_eq!(dt.to_string(), "2024-12-25 23:59:00");
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_report_timestamp("not-a-date").is_none());
        assert!(parse_report_timestamp("").is_none());
    }

    #[test]
    fn occurred_at_is_lenient() {
        let record = IncidentRecord::from_fields(fields(&[
            "99/99/9999 99:99",
            "123",
            "MAIN ST",
            "Theft",
            "Larceny",
        ]))
        .unwrap();
        assert!(record.occurred_at().is_none());
    }
}
