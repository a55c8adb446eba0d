#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident map application.
//!
//! A thin shell around the extraction core: report PDFs arrive by upload
//! or by URL fetch, every document's records are absorbed into one
//! session-scoped table, and the visualize endpoint serves the aggregation
//! tables (nature frequency, per-day hourly series, geocoded cluster
//! points) that the chart and clustering collaborators consume.

mod handlers;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_map_extract::ReportLayout;
use incident_map_session::SessionTable;

/// Default Nominatim endpoint for the geocoding adapter.
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default region suffix appended to report locations before geocoding.
const DEFAULT_GEOCODER_SUFFIX: &str = ", Norman, OK";

/// Geocoding adapter configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Whether the visualize endpoint geocodes locations at all.
    pub enabled: bool,
    /// Nominatim search endpoint.
    pub base_url: String,
    /// Region suffix appended to every location query.
    pub suffix: String,
}

impl GeocoderConfig {
    /// Builds the configuration from `GEOCODER_ENABLED`,
    /// `GEOCODER_BASE_URL`, and `GEOCODER_SUFFIX` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var("GEOCODER_ENABLED")
            .map_or(true, |v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            enabled,
            base_url: std::env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string()),
            suffix: std::env::var("GEOCODER_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_SUFFIX.to_string()),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Session-scoped record accumulation table.
    pub table: SessionTable,
    /// Extraction heuristic tunables for the target report family.
    pub layout: ReportLayout,
    /// HTTP client shared by the fetch and geocoding adapters.
    pub client: reqwest::Client,
    /// Directory uploaded and fetched PDFs are persisted under.
    pub upload_dir: PathBuf,
    /// Geocoding adapter configuration.
    pub geocoder: GeocoderConfig,
}

/// Starts the incident map API server.
///
/// Reads `BIND_ADDR`, `PORT`, `UPLOAD_DIR`, and the geocoder environment
/// variables, creates the upload directory, and starts the Actix-Web HTTP
/// server with a fresh session table. This is a regular async function —
/// the caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the upload directory cannot be
/// created or the HTTP server fails to bind.
///
/// # Panics
///
/// Panics if the HTTP client fails to build.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let upload_dir =
        PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));
    std::fs::create_dir_all(&upload_dir)?;

    let client = incident_map_fetch::build_client().expect("Failed to build HTTP client");

    let state = web::Data::new(AppState {
        table: SessionTable::new(),
        layout: ReportLayout::default(),
        client,
        upload_dir,
        geocoder: GeocoderConfig::from_env(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/upload", web::post().to(handlers::upload))
                    .route("/fetch", web::post().to(handlers::fetch))
                    .route("/records", web::get().to(handlers::records))
                    .route("/visualize", web::get().to(handlers::visualize))
                    .route("/session/stats", web::get().to(handlers::session_stats))
                    .route("/session/reset", web::post().to(handlers::reset)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
