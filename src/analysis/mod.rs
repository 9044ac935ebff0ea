//! Analysis — client for the remote locality analysis endpoint.
//!
//! DESIGN
//! ======
//! One `POST {"query": ...}` per user turn, one response, no retry and no
//! request timeout. Only the TCP connect is bounded so an unreachable host
//! fails instead of hanging. Parsing lives in `types::parse_response` so it
//! can be tested without a network.
//!
//! The [`AnalysisClient`] trait is the seam the controller depends on;
//! tests swap in a mock.

pub mod types;

use std::time::Duration;

use tracing::{info, warn};

pub use types::{AnalysisError, AnalysisResult, ChartRow, DataRow};
use types::{ApiRequest, parse_response};

// =============================================================================
// TRAIT
// =============================================================================

/// Provider-neutral async analysis call. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Run one analysis round trip for `query`.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] if the request fails or the response is
    /// not an analysis payload.
    async fn analyze(&self, query: &str) -> Result<AnalysisResult, AnalysisError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// `reqwest`-backed client for the analysis endpoint.
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    /// Build a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AnalysisError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into() })
    }

    /// Return the configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, query: &str) -> Result<AnalysisResult, AnalysisError> {
        info!(endpoint = %self.endpoint, query_len = query.len(), "analysis: request sent");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&ApiRequest { query })
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        // The backend answers generation failures with status 500 and a
        // displayable fallback payload, so the body wins over the status.
        let result = match parse_response(&text) {
            Ok(result) => result,
            Err(_) if !status.is_success() => {
                return Err(AnalysisError::Status { status: status.as_u16(), body: text });
            }
            Err(e) => return Err(e),
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "analysis: non-success status with analysis payload");
        }
        if let Some(detail) = &result.error_detail {
            warn!(%detail, "analysis: backend reported an error detail");
        }

        info!(
            status = status.as_u16(),
            is_comparison = result.is_comparison,
            chart_rows = result.chart.as_ref().map_or(0, Vec::len),
            table_rows = result.table.len(),
            "analysis: response decoded"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
