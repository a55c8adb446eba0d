#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the extraction types to allow independent evolution of the API
//! contract.

use incident_map_analytics::{ClusterPoint, DailySeries, NatureCount};
use incident_map_extract::ExtractionStats;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Request body for the fetch endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// Report PDF URLs to download and extract.
    pub urls: Vec<String>,
}

/// Result of ingesting a single uploaded document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Name the document was stored under.
    pub filename: String,
    /// Records this document contributed.
    pub records: u64,
    /// Extraction diagnostics for this document.
    pub stats: ExtractionStats,
    /// Total records accumulated in the session after this document.
    pub table_size: u64,
}

/// One successfully fetched and extracted document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedDocument {
    /// Source URL.
    pub url: String,
    /// Records this document contributed.
    pub records: u64,
}

/// One document that could not be fetched or extracted.
///
/// Failures are reported per document so one bad PDF never discards the
/// records already extracted from the others.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDocument {
    /// Source URL.
    pub url: String,
    /// What went wrong.
    pub error: String,
}

/// Response body for the fetch endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    /// Documents fetched and extracted, in request order.
    pub fetched: Vec<FetchedDocument>,
    /// Documents that failed, in request order.
    pub failed: Vec<FailedDocument>,
    /// Total records accumulated in the session after this request.
    pub table_size: u64,
}

/// Response body for the visualize endpoint: the tabular inputs the
/// chart/clustering collaborators consume.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizeResponse {
    /// Incident counts per nature, most frequent first.
    pub nature_frequency: Vec<NatureCount>,
    /// Per-date hourly incident counts.
    pub time_series: Vec<DailySeries>,
    /// Geocoded record rows for clustering (empty when geocoding is
    /// disabled).
    pub cluster_points: Vec<ClusterPoint>,
}
