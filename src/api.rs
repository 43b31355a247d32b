//! Recommendation backend API client
//!
//! Typed wrappers over the two backend endpoints (`/health`, `/recommend`).
//! Every failure is normalized into a single human-readable message so the
//! UI can surface it verbatim.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side timeout for a recommendation request
pub const RECOMMEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Message for a non-2xx response that carries no usable detail
pub const GENERIC_FAILURE: &str = "Failed to get recommendations";

/// Message for a request that got no response (connect failure or timeout)
pub const NO_RESPONSE: &str =
    "No response from server. Please check if the backend is running.";

/// One suggested assessment, ranked by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub assessment_name: String,
    pub assessment_url: String,
}

/// Ordered recommendations for one query
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Error payload the backend attaches to non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client bound to one backend base URL
///
/// Cheap to clone (the inner reqwest client is an Arc) so background tasks
/// can own a copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Build a client with connection pooling against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            // Connection pooling - reuses TCP connections across requests
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(120))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            // Compression
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("assess-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Check if the backend is up
    ///
    /// Logs and propagates any failure; no retry.
    pub async fn check_health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                eprintln!("Health check failed: {}", e);
                return Err(e).context("Health check request failed");
            }
        };

        if !response.status().is_success() {
            anyhow::bail!("Health endpoint returned status: {}", response.status());
        }

        response
            .json::<HealthResponse>()
            .await
            .context("Failed to parse health response")
    }

    /// Fetch recommendations for a query
    ///
    /// The error message is classified in priority order: backend-supplied
    /// `detail`, generic backend failure, no-response, then the underlying
    /// error's own text.
    pub async fn get_recommendations(&self, query: &str) -> Result<RecommendationsResponse> {
        let url = format!("{}/recommend", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query })
            .timeout(RECOMMEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!(transport_error_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(anyhow!(status_error_message(&body)));
        }

        response
            .json::<RecommendationsResponse>()
            .await
            .map_err(|e| anyhow!(transport_error_message(&e)))
    }
}

/// Message for a non-2xx response: the backend's `detail` field if usable,
/// else the generic failure text
fn status_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Message for a failure without an HTTP response
///
/// Connect failures and timeouts mean the backend never answered; anything
/// else (e.g. a malformed request before send) keeps its own description.
fn transport_error_message(err: &reqwest::Error) -> String {
    if err.is_timeout() || err.is_connect() {
        NO_RESPONSE.to_string()
    } else if err.is_builder() {
        err.to_string()
    } else if err.is_request() {
        // Sent but never answered (connection dropped mid-flight)
        NO_RESPONSE.to_string()
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_surfaced_verbatim() {
        let msg = status_error_message(br#"{"detail":"bad query"}"#);
        assert_eq!(msg, "bad query");
    }

    #[test]
    fn test_missing_detail_falls_back_to_generic() {
        let msg = status_error_message(br#"{"error":"nope"}"#);
        assert_eq!(msg, GENERIC_FAILURE);
    }

    #[test]
    fn test_blank_detail_falls_back_to_generic() {
        let msg = status_error_message(br#"{"detail":"   "}"#);
        assert_eq!(msg, GENERIC_FAILURE);
    }

    #[test]
    fn test_non_json_body_falls_back_to_generic() {
        let msg = status_error_message(b"<html>502 Bad Gateway</html>");
        assert_eq!(msg, GENERIC_FAILURE);
    }

    #[test]
    fn test_empty_body_falls_back_to_generic() {
        let msg = status_error_message(b"");
        assert_eq!(msg, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_connect_failure_yields_no_response_message() {
        // Port 1 refuses connections, so the request never gets a response
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let err = client.get_recommendations("rust dev").await.unwrap_err();
        assert_eq!(err.to_string(), NO_RESPONSE);
    }

    #[test]
    fn test_recommend_timeout_is_thirty_seconds() {
        assert_eq!(RECOMMEND_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_query_request_serializes_as_query_field() {
        let body = serde_json::to_string(&QueryRequest { query: "rust dev" }).unwrap();
        assert_eq!(body, r#"{"query":"rust dev"}"#);
    }

    #[test]
    fn test_recommendations_response_deserializes_in_order() {
        let json = r#"{"recommendations":[
            {"assessment_name":"A","assessment_url":"https://x/a"},
            {"assessment_name":"B","assessment_url":"https://x/b"}
        ]}"#;
        let parsed: RecommendationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.recommendations.len(), 2);
        assert_eq!(parsed.recommendations[0].assessment_name, "A");
        assert_eq!(parsed.recommendations[1].assessment_name, "B");
    }
}
