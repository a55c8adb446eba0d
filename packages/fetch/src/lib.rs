#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF retrieval for incident report sources.
//!
//! Departments publish their daily incident summaries at predictable URLs,
//! one PDF per day. This crate downloads those PDFs with bounded retry for
//! transient failures and persists them for the extraction pipeline to
//! consume. [`expand_daily_template`] generates the per-day URL list from a
//! `{date}` template.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum retry attempts for transient HTTP errors (connection failures,
/// timeouts, HTTP 429, HTTP 5xx). Backoff is 2s, 4s, 8s.
const MAX_RETRIES: u32 = 3;

/// Fallback file name when a URL has no usable basename.
const DEFAULT_FILENAME: &str = "report.pdf";

/// Errors that can occur while retrieving a PDF.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// The response status code.
        status: reqwest::StatusCode,
        /// The requested URL.
        url: String,
    },

    /// An I/O operation failed while persisting the download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the HTTP client used for report downloads.
///
/// Some report servers reject requests without a browser-like User-Agent,
/// so one is always sent.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if the client fails to build.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/91.0.4472.124 Safari/537.36",
        )
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .map_err(FetchError::Http)
}

/// Downloads the PDF at `url`, retrying transient failures.
///
/// Retries connection errors, timeouts, HTTP 429, and HTTP 5xx up to
/// [`MAX_RETRIES`] times with exponential backoff; other 4xx statuses are
/// permanent and fail immediately.
///
/// # Errors
///
/// Returns [`FetchError`] if the request still fails after all retries or
/// the server answers with a non-retryable status.
pub async fn fetch_pdf(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << attempt);
            log::warn!("retry {attempt}/{MAX_RETRIES} for {url} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) if is_transient(&e) && attempt < MAX_RETRIES => {
                log::warn!("transient error fetching {url}: {e}");
                continue;
            }
            Err(e) => return Err(FetchError::Http(e)),
        };

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            if attempt < MAX_RETRIES {
                log::warn!("HTTP {status} fetching {url}");
                continue;
            }
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }

        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {url}", bytes.len());

        if !bytes.starts_with(b"%PDF-") {
            log::warn!("{url} does not look like a PDF (missing %PDF- header)");
        }

        return Ok(bytes.to_vec());
    }

    unreachable!("fetch_pdf retry loop exited without returning")
}

/// Downloads the PDF at `url` and writes it into `dir`, deriving the file
/// name from the URL basename.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`FetchError`] if the download or the write fails.
pub async fn fetch_pdf_to_file(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
) -> Result<PathBuf, FetchError> {
    let bytes = fetch_pdf(client, url).await?;
    let path = dir.join(filename_from_url(url));

    tokio::fs::write(&path, &bytes).await?;

    log::info!("Saved {url} to {}", path.display());
    Ok(path)
}

/// Derives a safe file name from a URL's final path component.
///
/// Query strings and fragments are stripped; a URL with no usable basename
/// falls back to [`DEFAULT_FILENAME`].
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);

    let basename = without_query.rsplit('/').next().unwrap_or_default();

    if basename.is_empty() || basename.contains("..") {
        DEFAULT_FILENAME.to_owned()
    } else {
        basename.to_owned()
    }
}

/// Expands a URL template by replacing `{date}` placeholders with one
/// formatted date per day between `start` and `end` (inclusive).
///
/// The target report family publishes one summary PDF per day, so the
/// expansion steps daily (e.g. `"%Y-%m-%d"` for `"2024-08-01"`).
#[must_use]
pub fn expand_daily_template(
    template: &str,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    date_format: &str,
) -> Vec<String> {
    let mut urls = Vec::new();
    let mut current = start;

    while current <= end {
        urls.push(template.replace("{date}", &current.format(date_format).to_string()));

        let Some(next) = current.succ_opt() else {
            break; // date overflow
        };
        current = next;
    }

    urls
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn expands_daily_template_across_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();

        let urls = expand_daily_template(
            "https://police.example.gov/reports/{date}_daily_incident_summary.pdf",
            start,
            end,
            "%Y-%m-%d",
        );

        assert_eq!(
            urls,
            vec![
                "https://police.example.gov/reports/2024-01-30_daily_incident_summary.pdf",
                "https://police.example.gov/reports/2024-01-31_daily_incident_summary.pdf",
                "https://police.example.gov/reports/2024-02-01_daily_incident_summary.pdf",
                "https://police.example.gov/reports/2024-02-02_daily_incident_summary.pdf",
            ]
        );
    }

    #[test]
    fn empty_range_expands_to_nothing() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(expand_daily_template("{date}", start, end, "%Y-%m-%d").is_empty());
    }

    #[test]
    fn derives_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.gov/reports/2024-02-01.pdf"),
            "2024-02-01.pdf"
        );
        assert_eq!(
            filename_from_url("https://example.gov/reports/summary.pdf?download=1"),
            "summary.pdf"
        );
        assert_eq!(filename_from_url("https://example.gov/"), "report.pdf");
        assert_eq!(
            filename_from_url("https://example.gov/../../etc/passwd/.."),
            "report.pdf"
        );
    }
}
