#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation summaries over accumulated incident records.
//!
//! Produces the well-formed tabular inputs the external visualization and
//! clustering collaborators consume: nature frequency counts (bar chart),
//! per-day hourly counts (time series), and geocoded cluster input points.
//! Timestamp handling is lenient throughout — records whose raw timestamp
//! does not parse are treated as having no date, never as errors.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike as _};
use incident_map_incident_models::IncidentRecord;
use serde::Serialize;

/// How often one incident nature occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatureCount {
    /// Incident nature as printed in the report.
    pub nature: String,
    /// Number of records with this nature.
    pub count: u64,
}

/// Incident count for one hour of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCount {
    /// Hour of day (0-23).
    pub hour: u32,
    /// Number of incidents in this hour.
    pub count: u64,
}

/// Hourly incident counts for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeries {
    /// The calendar date.
    pub date: NaiveDate,
    /// Counts for the hours that saw incidents, in hour order.
    pub counts: Vec<HourlyCount>,
}

/// One row of the cluster input table: a record joined to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Original free-text location.
    pub location: String,
    /// Incident nature.
    pub nature: String,
    /// Raw record timestamp.
    pub date_time: String,
}

/// Counts records per nature, most frequent first (ties break on name).
#[must_use]
pub fn nature_frequency(records: &[IncidentRecord]) -> Vec<NatureCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.nature.as_str()).or_default() += 1;
    }

    let mut frequencies: Vec<NatureCount> = counts
        .into_iter()
        .map(|(nature, count)| NatureCount {
            nature: nature.to_owned(),
            count,
        })
        .collect();

    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.nature.cmp(&b.nature)));
    frequencies
}

/// Groups records by calendar date and counts incidents per hour.
///
/// Records with unparseable timestamps are dropped from the series (the
/// drop count is logged); dates appear in chronological order and hours in
/// ascending order within each date.
#[must_use]
pub fn hourly_series(records: &[IncidentRecord]) -> Vec<DailySeries> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<u32, u64>> = BTreeMap::new();
    let mut skipped: u64 = 0;

    for record in records {
        if let Some(occurred) = record.occurred_at() {
            *days
                .entry(occurred.date())
                .or_default()
                .entry(occurred.time().hour())
                .or_default() += 1;
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} records with unparseable timestamps");
    }

    days.into_iter()
        .map(|(date, hours)| DailySeries {
            date,
            counts: hours
                .into_iter()
                .map(|(hour, count)| HourlyCount { hour, count })
                .collect(),
        })
        .collect()
}

/// Joins records to coordinates, producing the cluster input table.
///
/// `coordinates` looks up the latitude/longitude for a record's free-text
/// location (typically a geocoder result map); records with no coordinates
/// are skipped. Row order follows record order.
#[must_use]
pub fn cluster_points(
    records: &[IncidentRecord],
    coordinates: impl Fn(&str) -> Option<(f64, f64)>,
) -> Vec<ClusterPoint> {
    records
        .iter()
        .filter_map(|record| {
            let (latitude, longitude) = coordinates(&record.location)?;
            Some(ClusterPoint {
                latitude,
                longitude,
                location: record.location.clone(),
                nature: record.nature.clone(),
                date_time: record.date_time.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date_time: &str, location: &str, nature: &str) -> IncidentRecord {
        IncidentRecord {
            date_time: date_time.to_owned(),
            incident_number: "2024-00000001".to_owned(),
            location: location.to_owned(),
            nature: nature.to_owned(),
            incident_type: "Larceny".to_owned(),
        }
    }

    #[test]
    fn frequency_sorts_by_count_then_name() {
        let records = vec![
            record("1/2/2024 5:30", "A ST", "Theft"),
            record("1/2/2024 6:30", "B ST", "Assault"),
            record("1/2/2024 7:30", "C ST", "Theft"),
            record("1/2/2024 8:30", "D ST", "Welfare Check"),
        ];

        let freq = nature_frequency(&records);

        assert_eq!(freq[0].nature, "Theft");
        assert_eq!(freq[0].count, 2);
        assert_eq!(freq[1].nature, "Assault");
        assert_eq!(freq[2].nature, "Welfare Check");
    }

    #[test]
    fn hourly_series_groups_by_date_and_hour() {
        let records = vec![
            record("1/2/2024 5:30", "A ST", "Theft"),
            record("1/2/2024 5:45", "B ST", "Theft"),
            record("1/2/2024 23:10", "C ST", "Theft"),
            record("1/3/2024 0:05", "D ST", "Theft"),
        ];

        let series = hourly_series(&records);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2024-01-02");
        assert_eq!(
            series[0].counts,
            [
                HourlyCount { hour: 5, count: 2 },
                HourlyCount { hour: 23, count: 1 },
            ]
        );
        assert_eq!(series[1].date.to_string(), "2024-01-03");
        assert_eq!(series[1].counts, [HourlyCount { hour: 0, count: 1 }]);
    }

    #[test]
    fn hourly_series_drops_unparseable_timestamps() {
        let records = vec![
            record("not a date", "A ST", "Theft"),
            record("1/2/2024 5:30", "B ST", "Theft"),
        ];

        let series = hourly_series(&records);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].counts, [HourlyCount { hour: 5, count: 1 }]);
    }

    #[test]
    fn cluster_points_skips_unresolved_locations() {
        let records = vec![
            record("1/2/2024 5:30", "MAIN ST", "Theft"),
            record("1/2/2024 6:30", "NOWHERE", "Theft"),
        ];

        let points = cluster_points(&records, |location| {
            (location == "MAIN ST").then_some((35.22, -97.44))
        });

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].location, "MAIN ST");
        assert!((points[0].latitude - 35.22).abs() < f64::EPSILON);
    }

    #[test]
    fn cluster_points_preserve_record_order() {
        let records = vec![
            record("1/2/2024 5:30", "A ST", "Theft"),
            record("1/2/2024 6:30", "B ST", "Theft"),
        ];

        let points = cluster_points(&records, |_| Some((1.0, 2.0)));

        assert_eq!(points[0].location, "A ST");
        assert_eq!(points[1].location, "B ST");
    }
}
