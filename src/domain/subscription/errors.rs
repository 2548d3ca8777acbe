//! Subscription-specific error types.
//!
//! Three terminal failure families per request: malformed input
//! (`ValidationError`), denied access (`DenialReason`, see the
//! authorization module) and unknown identifiers. Nothing here is retried.

use thiserror::Error;

use crate::domain::authorization::DenialReason;
use crate::ports::StoreError;

use super::SubscriptionId;

/// Structural validation failures for subscription requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The source filter is not an acceptable absolute URI.
    #[error("Source filter '{value}' is invalid: {reason}")]
    InvalidSource { value: String, reason: String },

    /// The webhook endpoint is not an absolute URI.
    #[error("Endpoint '{value}' is invalid: {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// End users may not subscribe unscoped.
    #[error("End user subscriptions must include a subject filter")]
    MissingSubjectForUser,
}

impl ValidationError {
    pub fn invalid_source(value: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidSource {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_endpoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidEndpoint {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the public subscription operations.
///
/// `Denied` is kept distinct from `NotFound` so the transport layer can
/// decide whether to collapse them and avoid existence leaks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubscriptionError {
    /// The request itself is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller is not allowed to perform the operation.
    #[error(transparent)]
    Denied(#[from] DenialReason),

    /// No subscription exists with the given identifier.
    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),

    /// The persistence layer failed.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl SubscriptionError {
    /// True when the error is an access denial rather than a missing row.
    pub fn is_denied(&self) -> bool {
        matches!(self, SubscriptionError::Denied(_))
    }

    /// True when the identifier simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SubscriptionError::NotFound(_))
    }
}

impl From<StoreError> for SubscriptionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SubscriptionError::NotFound(id),
            StoreError::Database(message) => SubscriptionError::Storage(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_source_displays_value_and_reason() {
        let err = ValidationError::invalid_source("skd/flyttemelding", "relative URL");
        let message = err.to_string();
        assert!(message.contains("skd/flyttemelding"));
        assert!(message.contains("relative URL"));
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: SubscriptionError = StoreError::NotFound(SubscriptionId::new(16)).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Subscription not found: 16");
    }

    #[test]
    fn store_database_error_maps_to_storage() {
        let err: SubscriptionError = StoreError::Database("connection reset".to_string()).into();
        assert!(matches!(err, SubscriptionError::Storage(_)));
    }

    #[test]
    fn denial_maps_to_denied() {
        let err: SubscriptionError = DenialReason::Unauthorized.into();
        assert!(err.is_denied());
        assert!(!err.is_not_found());
    }
}
