//! HTTP adapter for the policy decision point.
//!
//! Speaks the XACML JSON profile: the decision request is wrapped in a
//! `Request` object and the engine answers with a `Response` array whose
//! first element carries the decision string. Every transport, timeout or
//! decode failure maps to `PolicyError::Unavailable`; the gate turns that
//! into a denial.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::authorization::{DecisionRequest, PolicyDecision, PolicyError};
use crate::ports::PolicyDecisionPoint;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the HTTP policy decision point adapter.
#[derive(Debug, Clone)]
pub struct PdpConfig {
    /// Full URL of the decision endpoint
    /// (e.g. "https://platform.altinn.no/authorization/api/v1/decision").
    pub decision_endpoint: String,

    /// Per-request timeout. Defaults to 5 seconds; a timed-out call is
    /// reported as unavailable, never waited out indefinitely.
    pub timeout: Option<Duration>,
}

impl PdpConfig {
    /// Creates a configuration with the default timeout.
    pub fn new(decision_endpoint: impl Into<String>) -> Self {
        Self {
            decision_endpoint: decision_endpoint.into(),
            timeout: None,
        }
    }

    /// Sets a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

impl From<&crate::config::PdpSettings> for PdpConfig {
    fn from(settings: &crate::config::PdpSettings) -> Self {
        PdpConfig::new(settings.decision_endpoint.clone()).with_timeout(settings.timeout())
    }
}

/// XACML JSON request envelope.
#[derive(Debug, Serialize)]
struct XacmlJsonRequest<'a> {
    #[serde(rename = "Request")]
    request: &'a DecisionRequest,
}

/// XACML JSON response envelope.
#[derive(Debug, Deserialize)]
struct XacmlJsonResponse {
    #[serde(rename = "Response", default)]
    response: Vec<XacmlJsonResult>,
}

#[derive(Debug, Deserialize)]
struct XacmlJsonResult {
    #[serde(rename = "Decision", default)]
    decision: String,
}

/// `PolicyDecisionPoint` implementation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPolicyDecisionPoint {
    client: reqwest::Client,
    config: PdpConfig,
}

impl HttpPolicyDecisionPoint {
    /// Creates the adapter with its own pooled HTTP client.
    ///
    /// # Errors
    ///
    /// `PolicyError::Unavailable` when the client cannot be constructed.
    pub fn new(config: PdpConfig) -> Result<Self, PolicyError> {
        let client = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .build()
            .map_err(|e| PolicyError::unavailable(format!("failed to build client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PolicyDecisionPoint for HttpPolicyDecisionPoint {
    async fn authorize(&self, request: DecisionRequest) -> Result<PolicyDecision, PolicyError> {
        let response = self
            .client
            .post(&self.config.decision_endpoint)
            .json(&XacmlJsonRequest { request: &request })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "policy decision request failed");
                PolicyError::unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "policy decision point returned an error status");
            return Err(PolicyError::unavailable(format!(
                "decision endpoint returned {}",
                status
            )));
        }

        let body: XacmlJsonResponse = response.json().await.map_err(|e| {
            error!(error = %e, "policy decision response could not be decoded");
            PolicyError::unavailable(e.to_string())
        })?;

        let decision = body
            .response
            .first()
            .map(|r| PolicyDecision::from_xacml(&r.decision))
            .unwrap_or(PolicyDecision::Indeterminate);

        debug!(?decision, "policy decision received");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_five_second_timeout() {
        let config = PdpConfig::new("https://pdp.example.com/decision");
        assert_eq!(config.effective_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn config_accepts_custom_timeout() {
        let config = PdpConfig::new("https://pdp.example.com/decision")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.effective_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn empty_response_array_decodes_as_indeterminate() {
        let body: XacmlJsonResponse = serde_json::from_str(r#"{"Response":[]}"#).unwrap();
        let decision = body
            .response
            .first()
            .map(|r| PolicyDecision::from_xacml(&r.decision))
            .unwrap_or(PolicyDecision::Indeterminate);
        assert_eq!(decision, PolicyDecision::Indeterminate);
    }

    #[test]
    fn permit_response_decodes() {
        let body: XacmlJsonResponse =
            serde_json::from_str(r#"{"Response":[{"Decision":"Permit"}]}"#).unwrap();
        assert_eq!(
            PolicyDecision::from_xacml(&body.response[0].decision),
            PolicyDecision::Permit
        );
    }
}
