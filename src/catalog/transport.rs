//! HTTP transport for catalog requests
//!
//! The catalog components only ever issue GET requests with a handful of
//! query parameters, so the transport is a single-method trait. The reqwest
//! implementation below is used in production; tests substitute a scripted
//! double.

use super::CatalogError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Fixed timeout for every catalog request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default TMDB API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET access to the catalog.
///
/// Implementors resolve `path` (for example `search/tv`) against their own
/// base URL and append `query` as URL parameters. Network failures map to
/// `CatalogError::Request`; a response with any status is returned as-is.
pub trait CatalogTransport: Send + Sync {
    /// Performs a GET request and returns the status and body.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<TransportResponse, CatalogError>;
}

/// Transport backed by a blocking reqwest client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for the given API root with the fixed request timeout.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl CatalogTransport for ReqwestTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<TransportResponse, CatalogError> {
        let url = build_url(&self.base_url, path, query);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// Joins base URL, path and query string.
///
/// Values are percent-encoded with spaces kept as `%20` rather than the
/// form-style `+`, which the catalog's free-text search expects.
fn build_url(base_url: &str, path: &str, query: &[(&str, String)]) -> String {
    let query_string = query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query_string.is_empty() {
        format!("{}/{}", base_url, path)
    } else {
        format!("{}/{}?{}", base_url, path, query_string)
    }
}

/// Issues a GET and deserializes a successful JSON body.
pub(crate) fn fetch_json<T: DeserializeOwned>(
    transport: &dyn CatalogTransport,
    path: &str,
    query: &[(&str, String)],
) -> Result<T, CatalogError> {
    debug!(path, "Requesting catalog resource");

    let response = transport.get(path, query)?;

    if !response.is_success() {
        return Err(CatalogError::Status {
            status: response.status,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| CatalogError::Parse(e.to_string()))
}
