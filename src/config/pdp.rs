//! Policy decision point configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Policy decision point configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PdpSettings {
    /// Full URL of the decision endpoint
    pub decision_endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PdpSettings {
    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate policy decision point configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.decision_endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("PDP decision_endpoint"));
        }
        if !self.decision_endpoint.starts_with("http://")
            && !self.decision_endpoint.starts_with("https://")
        {
            return Err(ValidationError::InvalidDecisionEndpoint);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str, timeout_secs: u64) -> PdpSettings {
        PdpSettings {
            decision_endpoint: endpoint.to_string(),
            timeout_secs,
        }
    }

    #[test]
    fn accepts_https_endpoint() {
        assert!(settings("https://pdp.example.com/decision", 5).validate().is_ok());
    }

    #[test]
    fn rejects_missing_endpoint() {
        assert!(matches!(
            settings("", 5).validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        assert!(matches!(
            settings("ftp://pdp.example.com", 5).validate(),
            Err(ValidationError::InvalidDecisionEndpoint)
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        // A zero timeout would effectively disable the fail-closed
        // deadline on policy calls.
        assert!(matches!(
            settings("https://pdp.example.com/decision", 0).validate(),
            Err(ValidationError::InvalidTimeout)
        ));
    }
}
