//! Decision types for the authorization gate and the policy decision point.
//!
//! The external policy call is modeled as a result type the whole way
//! through: a reachable engine answers `Permit | Deny | Indeterminate`,
//! and a transport failure is `PolicyError::Unavailable`. No fault ever
//! crosses into business logic as a panic, and unavailability always
//! resolves to denial (fail closed).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::attributes::{AttributeCategory, AttributeValueType, IdentityAttribute};

const ACTION_ATTRIBUTE_ID: &str = "urn:oasis:names:tc:xacml:1.0:action:action-id";
const RESOURCE_ATTRIBUTE_ID: &str = "urn:oasis:names:tc:xacml:1.0:resource:resource-id";
const RESOURCE_EVENTS: &str = "events-subscription";
const ACTION_SUBSCRIBE: &str = "subscribe";

/// Outcome of the authorization gate for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzDecision {
    /// The caller may proceed.
    Allowed,
    /// The caller may not proceed.
    Denied(DenialReason),
}

impl AuthzDecision {
    /// Returns true if the operation was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthzDecision::Allowed)
    }

    /// Returns true if the operation was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, AuthzDecision::Denied(_))
    }

    /// Converts the decision to a `Result`, with denial becoming an error.
    pub fn into_result(self) -> Result<(), DenialReason> {
        match self {
            AuthzDecision::Allowed => Ok(()),
            AuthzDecision::Denied(reason) => Err(reason),
        }
    }
}

/// Why the gate denied an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    /// The caller's identity does not entitle it to act on this
    /// subscription.
    #[error("Caller is not authorized for this subscription")]
    Unauthorized,

    /// The policy decision point evaluated the request and denied it
    /// (an indeterminate answer counts as denial).
    #[error("The policy decision point denied the request")]
    PolicyDenied,

    /// The policy decision point could not be reached; denied because
    /// reachability failures must never become implicit permits.
    #[error("The policy decision point is unavailable: {0}")]
    PolicyUnavailable(String),
}

/// The ternary answer of a reachable policy decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyDecision {
    Permit,
    Deny,
    /// The engine could not evaluate the request (includes XACML
    /// `NotApplicable`). Treated as deny.
    Indeterminate,
}

impl PolicyDecision {
    /// Parses an XACML decision string, collapsing anything that is not a
    /// clean permit or deny to `Indeterminate`.
    pub fn from_xacml(decision: &str) -> Self {
        match decision {
            "Permit" => PolicyDecision::Permit,
            "Deny" => PolicyDecision::Deny,
            _ => PolicyDecision::Indeterminate,
        }
    }
}

/// Failure talking to the policy decision point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Network failure, timeout or an unintelligible response.
    #[error("Policy decision point unavailable: {0}")]
    Unavailable(String),
}

impl PolicyError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        PolicyError::Unavailable(message.into())
    }
}

/// A decision request in the shape the policy engine evaluates:
/// who is asking (access subject), about what (resource) and what they
/// want to do (action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    #[serde(rename = "AccessSubject")]
    pub access_subject: AttributeCategory,

    #[serde(rename = "Resource")]
    pub resource: AttributeCategory,

    #[serde(rename = "Action")]
    pub action: AttributeCategory,
}

impl DecisionRequest {
    /// Builds a subscribe-action request from caller and subject
    /// attribute categories.
    pub fn subscribe(caller: AttributeCategory, subject: AttributeCategory) -> Self {
        let resource = subject.with_attribute(IdentityAttribute::new(
            RESOURCE_ATTRIBUTE_ID,
            RESOURCE_EVENTS,
            AttributeValueType::String,
        ));
        let action = AttributeCategory::single(IdentityAttribute::new(
            ACTION_ATTRIBUTE_ID,
            ACTION_SUBSCRIBE,
            AttributeValueType::String,
        ));

        Self {
            access_subject: caller,
            resource,
            action,
        }
    }
}
