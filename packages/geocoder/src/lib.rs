#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding adapter for incident locations.
//!
//! Report locations are free-text street references (e.g. `1600 W MAIN ST`)
//! with no coordinates. This crate resolves them to latitude/longitude via
//! Nominatim / OpenStreetMap so the clustering and map collaborators get a
//! well-formed coordinate table. Nominatim's public instance allows at most
//! **1 request per second**; [`geocode_unique`] paces itself accordingly
//! and geocodes each distinct location string only once.

pub mod nominatim;

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Pause between consecutive Nominatim requests (public-instance limit).
pub const RATE_LIMIT: Duration = Duration::from_secs(1);

/// A resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The canonical address returned by the geocoder.
    pub display_name: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Geocodes each distinct location string once, returning the resolved
/// subset keyed by the original location text.
///
/// `suffix` is appended to every query to pin the free-text street
/// reference to the report's jurisdiction (e.g. `", Norman, OK"`).
/// Failures and non-matches are logged and skipped — a location the
/// geocoder cannot resolve simply contributes no coordinate row.
pub async fn geocode_unique(
    client: &reqwest::Client,
    base_url: &str,
    locations: impl IntoIterator<Item = String>,
    suffix: &str,
) -> BTreeMap<String, GeocodedPoint> {
    let unique: std::collections::BTreeSet<String> = locations.into_iter().collect();
    let total = unique.len();

    let mut resolved = BTreeMap::new();

    for (i, location) in unique.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(RATE_LIMIT).await;
        }

        let query = format!("{location}{suffix}");

        match nominatim::geocode_freeform(client, base_url, &query).await {
            Ok(Some(point)) => {
                resolved.insert(location, point);
            }
            Ok(None) => {
                log::debug!("no geocode match for {query:?}");
            }
            Err(e) => {
                log::warn!("geocoding failed for {query:?}: {e}");
            }
        }
    }

    log::info!("Geocoded {}/{total} unique locations", resolved.len());

    resolved
}
