//! The Subscription entity and its pre-persistence request shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::foundation::SubjectIdentifier;

use super::errors::ValidationError;

/// Store-assigned subscription identifier.
///
/// Allocated exactly once at the persistence boundary and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(i64);

impl SubscriptionId {
    /// Wraps an existing identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A registered interest in future events.
///
/// Everything except `validated` is immutable after creation; changes are
/// modeled as delete-and-recreate. `created_by` drives read/delete access
/// control, `consumer` drives delivery ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Store-assigned identifier.
    pub id: SubscriptionId,

    /// Absolute URI the event source must match.
    pub source_filter: Url,

    /// Subject the owner is entitled to receive events about.
    pub subject_filter: Option<String>,

    /// Alternative subject identifier; at most one of the two subject
    /// fields drives authorization.
    pub alternative_subject_filter: Option<String>,

    /// Restricts matching to a single event type when present.
    pub type_filter: Option<String>,

    /// Identity of the receiving party (`/user/{id}`, `/org/{id}` or
    /// `/party/{id}`).
    pub consumer: String,

    /// Absolute URI of the webhook destination.
    pub end_point: Url,

    /// Identity of the caller who registered the subscription.
    pub created_by: String,

    /// Insertion timestamp, set by the store, UTC.
    pub created: DateTime<Utc>,

    /// Whether the endpoint confirmation handshake has completed.
    /// Unvalidated subscriptions never receive live traffic.
    pub validated: bool,
}

impl Subscription {
    /// Builds the persisted shape from an accepted request.
    ///
    /// Used by store adapters after the persistence boundary has assigned
    /// an identifier and a timestamp.
    pub fn from_request(
        id: SubscriptionId,
        request: &SubscriptionRequest,
        created_by: &str,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source_filter: request.source_filter.clone(),
            subject_filter: request.subject_filter.clone(),
            alternative_subject_filter: request.alternative_subject_filter.clone(),
            type_filter: request.type_filter.clone(),
            consumer: request.consumer.clone(),
            end_point: request.end_point.clone(),
            created_by: created_by.to_string(),
            created,
            validated: false,
        }
    }

    /// True when the consumer is an organisation identity.
    pub fn has_org_consumer(&self) -> bool {
        SubjectIdentifier::parse(&self.consumer).is_org()
    }

    /// True when the given normalized identity registered this subscription.
    pub fn is_created_by(&self, identity: &str) -> bool {
        self.created_by == identity.trim()
    }
}

/// The caller-supplied shape of a subscription before persistence.
///
/// `created_by` is deliberately absent; the lifecycle stamps it from the
/// authenticated caller, never from request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub source_filter: Url,
    pub subject_filter: Option<String>,
    pub alternative_subject_filter: Option<String>,
    pub type_filter: Option<String>,
    pub consumer: String,
    pub end_point: Url,
}

impl SubscriptionRequest {
    /// Builds a request from raw strings, enforcing absolute URIs.
    ///
    /// # Errors
    ///
    /// `InvalidSource` / `InvalidEndpoint` when the respective value does
    /// not parse as an absolute URI.
    pub fn from_parts(
        source_filter: &str,
        subject_filter: Option<String>,
        alternative_subject_filter: Option<String>,
        type_filter: Option<String>,
        consumer: &str,
        end_point: &str,
    ) -> Result<Self, ValidationError> {
        let source = Url::parse(source_filter)
            .map_err(|e| ValidationError::invalid_source(source_filter, e.to_string()))?;
        let end_point = Url::parse(end_point)
            .map_err(|e| ValidationError::invalid_endpoint(end_point, e.to_string()))?;

        Ok(Self {
            source_filter: source,
            subject_filter: subject_filter.filter(|s| !s.trim().is_empty()),
            alternative_subject_filter: alternative_subject_filter
                .filter(|s| !s.trim().is_empty()),
            type_filter: type_filter.filter(|s| !s.trim().is_empty()),
            consumer: consumer.trim().to_string(),
            end_point,
        })
    }

    /// The subject string that drives authorization, if any.
    ///
    /// `subject_filter` wins when both fields are set.
    pub fn driving_subject(&self) -> Option<&str> {
        self.subject_filter
            .as_deref()
            .or(self.alternative_subject_filter.as_deref())
    }
}
