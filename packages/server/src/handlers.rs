//! HTTP handler functions for the incident map API.

use std::path::Path;

use actix_web::{HttpResponse, web};
use incident_map_extract::extract_report_from_mem;
use incident_map_server_models::{
    ApiHealth, FailedDocument, FetchRequest, FetchReport, FetchedDocument, IngestSummary,
    VisualizeResponse,
};
use serde::Deserialize;

use crate::AppState;

/// Fallback name for uploads without a usable `filename` parameter.
const DEFAULT_UPLOAD_NAME: &str = "upload.pdf";

/// Errors from ingesting one document (fetch + persist + extract).
#[derive(Debug, thiserror::Error)]
enum IngestError {
    #[error(transparent)]
    Fetch(#[from] incident_map_fetch::FetchError),

    #[error(transparent)]
    Extract(#[from] incident_map_extract::ExtractError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

/// Query parameters for the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Name to store the uploaded document under.
    pub filename: Option<String>,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/upload?filename=<name>`
///
/// Accepts a raw PDF body, persists it under the upload directory, runs
/// the extraction pipeline, and absorbs the result into the session table.
pub async fn upload(
    state: web::Data<AppState>,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> HttpResponse {
    if body.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No file provided."
        }));
    }

    let filename = sanitize_filename(params.filename.as_deref());
    let save_path = state.upload_dir.join(&filename);

    if let Err(e) = tokio::fs::write(&save_path, &body).await {
        log::error!("Failed to persist upload {filename}: {e}");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to store uploaded file"
        }));
    }

    let layout = state.layout.clone();
    let extraction = match web::block(move || extract_report_from_mem(&body, &layout)).await {
        Ok(Ok(extraction)) => extraction,
        Ok(Err(e)) => {
            log::error!("Failed to extract {filename}: {e}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
        Err(e) => {
            log::error!("Extraction task failed for {filename}: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Extraction task failed"
            }));
        }
    };

    let records = extraction.records.len() as u64;
    let stats = extraction.stats;
    state.table.absorb(extraction);

    log::info!("Absorbed {records} records from upload {filename}");

    HttpResponse::Ok().json(IngestSummary {
        filename,
        records,
        stats,
        table_size: state.table.len() as u64,
    })
}

/// `POST /api/fetch`
///
/// Downloads each requested report URL, extracts it, and absorbs the
/// records. Failures are isolated per document: one bad PDF is reported in
/// `failed` while every other document's records are kept.
pub async fn fetch(state: web::Data<AppState>, body: web::Json<FetchRequest>) -> HttpResponse {
    if body.urls.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No URLs provided."
        }));
    }

    let mut fetched = Vec::new();
    let mut failed = Vec::new();

    for url in &body.urls {
        match ingest_url(&state, url).await {
            Ok(records) => fetched.push(FetchedDocument {
                url: url.clone(),
                records,
            }),
            Err(e) => {
                log::error!("Failed to ingest {url}: {e}");
                failed.push(FailedDocument {
                    url: url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    HttpResponse::Ok().json(FetchReport {
        fetched,
        failed,
        table_size: state.table.len() as u64,
    })
}

/// `GET /api/records`
///
/// Returns the accumulated session records in arrival order.
pub async fn records(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.table.snapshot())
}

/// `GET /api/visualize`
///
/// Returns the aggregation tables the chart/clustering collaborators
/// consume. Responds 400 while the session table is empty, matching the
/// upload-first workflow.
pub async fn visualize(state: web::Data<AppState>) -> HttpResponse {
    let rows = state.table.snapshot();

    if rows.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No data available for visualization."
        }));
    }

    let nature_frequency = incident_map_analytics::nature_frequency(&rows);
    let time_series = incident_map_analytics::hourly_series(&rows);

    let cluster_points = if state.geocoder.enabled {
        let resolved = incident_map_geocoder::geocode_unique(
            &state.client,
            &state.geocoder.base_url,
            rows.iter().map(|r| r.location.clone()),
            &state.geocoder.suffix,
        )
        .await;

        incident_map_analytics::cluster_points(&rows, |location| {
            resolved.get(location).map(|p| (p.latitude, p.longitude))
        })
    } else {
        Vec::new()
    };

    HttpResponse::Ok().json(VisualizeResponse {
        nature_frequency,
        time_series,
        cluster_points,
    })
}

/// `GET /api/session/stats`
///
/// Returns the cumulative extraction diagnostics for the session.
pub async fn session_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.table.stats())
}

/// `POST /api/session/reset`
///
/// Empties the session table and resets its counters.
pub async fn reset(state: web::Data<AppState>) -> HttpResponse {
    state.table.clear();
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Session reset."
    }))
}

/// Fetches, persists, extracts, and absorbs one report URL.
async fn ingest_url(state: &AppState, url: &str) -> Result<u64, IngestError> {
    let bytes = incident_map_fetch::fetch_pdf(&state.client, url).await?;

    let save_path = state
        .upload_dir
        .join(incident_map_fetch::filename_from_url(url));
    tokio::fs::write(&save_path, &bytes).await?;

    let layout = state.layout.clone();
    let extraction = web::block(move || extract_report_from_mem(&bytes, &layout))
        .await
        .map_err(|e| IngestError::Blocking(e.to_string()))??;

    let records = extraction.records.len() as u64;
    state.table.absorb(extraction);

    Ok(records)
}

/// Reduces a caller-supplied file name to its final path component.
fn sanitize_filename(filename: Option<&str>) -> String {
    filename
        .and_then(|f| Path::new(f).file_name())
        .map_or_else(
            || DEFAULT_UPLOAD_NAME.to_owned(),
            |name| name.to_string_lossy().into_owned(),
        )
}
