//! Policy decision point port.

use async_trait::async_trait;

use crate::domain::authorization::{DecisionRequest, PolicyDecision, PolicyError};

/// Port for the external attribute-based policy engine.
///
/// The call is a blocking request/response with no local cache; adapters
/// must apply a timeout and report it as `PolicyError::Unavailable` rather
/// than blocking indefinitely. Retry policy belongs to collaborators, not
/// to this crate.
#[async_trait]
pub trait PolicyDecisionPoint: Send + Sync {
    /// Evaluates a decision request, returning the engine's ternary answer.
    async fn authorize(&self, request: DecisionRequest) -> Result<PolicyDecision, PolicyError>;
}
