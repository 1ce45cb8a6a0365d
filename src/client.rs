//! HTTP client for the analysis backend.
//!
//! One request per call, no retries. Non-2xx replies to `analyze` are
//! failures carrying the status; replies with an embedded `error` field are
//! not (see [`AnalysisResult`]).
use crate::analysis::{AnalysisResult, AnalyzeRequest, AnalyzeResponse};
use crate::config::ClientConfig;
use serde_json::Value;
use thiserror::Error;
use ureq::http::Response;
use ureq::{Agent, Body};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("API error: {status}")]
    Transport { status: u16 },
    /// No response was obtained (connection refused, DNS, timeout, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered 2xx with a body that is not an analysis result.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    agent: Agent,
}

impl AnalysisClient {
    pub fn new(config: &ClientConfig) -> Self {
        let agent_config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(agent_config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Submit `query` for analysis. The query is passed through as-is;
    /// emptiness and length checks belong to the caller.
    pub fn analyze(&self, query: &str) -> Result<AnalysisResult, ClientError> {
        let url = self.endpoint("analyze");
        tracing::debug!(%url, query_len = query.len(), "submitting analysis");
        let response = self
            .agent
            .post(&url)
            .send_json(&AnalyzeRequest {
                query: query.to_string(),
            })
            .map_err(|err| ClientError::Network(err.to_string()))?;
        let mut response = require_success(response)?;
        let decoded: AnalyzeResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))?;
        let result = AnalysisResult::from(decoded);
        tracing::info!(
            charts = result.charts.len(),
            embedded_error = result.is_error(),
            "analysis received"
        );
        Ok(result)
    }

    /// Liveness probe. Any failure, including no response at all, reads as
    /// unhealthy.
    pub fn check_health(&self) -> bool {
        match self.agent.get(&self.endpoint("health")).call() {
            Ok(response) => {
                let healthy = response.status().is_success();
                tracing::debug!(status = response.status().as_u16(), healthy, "health probe");
                healthy
            }
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                false
            }
        }
    }

    /// Fetch the health body (`{status, api, r_service}` on current
    /// backends) for diagnostics. Unlike [`AnalysisClient::check_health`],
    /// failures are returned.
    pub fn health_report(&self) -> Result<Value, ClientError> {
        let response = self
            .agent
            .get(&self.endpoint("health"))
            .call()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        let mut response = require_success(response)?;
        response
            .body_mut()
            .read_json()
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))
    }
}

fn require_success(response: Response<Body>) -> Result<Response<Body>, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(status = status.as_u16(), "backend returned an error status");
    Err(ClientError::Transport {
        status: status.as_u16(),
    })
}
