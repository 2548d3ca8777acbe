//! Stub policy decision point for development and testing.
//!
//! Returns a fixed decision and records every request it receives so
//! tests can assert on what was (or was not) sent to the engine.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::authorization::{DecisionRequest, PolicyDecision, PolicyError};
use crate::ports::PolicyDecisionPoint;

/// Stub `PolicyDecisionPoint` with a configurable fixed outcome.
///
/// For development and testing purposes only.
pub struct StubPolicyDecisionPoint {
    outcome: Result<PolicyDecision, PolicyError>,
    requests: Arc<Mutex<Vec<DecisionRequest>>>,
}

impl StubPolicyDecisionPoint {
    fn with_outcome(outcome: Result<PolicyDecision, PolicyError>) -> Self {
        Self {
            outcome,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A stub that permits every request.
    pub fn permitting() -> Self {
        Self::with_outcome(Ok(PolicyDecision::Permit))
    }

    /// A stub that denies every request.
    pub fn denying() -> Self {
        Self::with_outcome(Ok(PolicyDecision::Deny))
    }

    /// A stub that answers indeterminate on every request.
    pub fn indeterminate() -> Self {
        Self::with_outcome(Ok(PolicyDecision::Indeterminate))
    }

    /// A stub that simulates an unreachable engine.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(PolicyError::unavailable(message)))
    }

    /// Handle to the recorded requests, for test assertions.
    pub fn recorder(&self) -> Arc<Mutex<Vec<DecisionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl PolicyDecisionPoint for StubPolicyDecisionPoint {
    async fn authorize(&self, request: DecisionRequest) -> Result<PolicyDecision, PolicyError> {
        self.requests
            .lock()
            .expect("StubPolicyDecisionPoint: lock poisoned")
            .push(request);
        self.outcome.clone()
    }
}
