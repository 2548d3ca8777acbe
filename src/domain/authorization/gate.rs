//! The authorization gate: per-operation allow/deny decisions.
//!
//! Identity comparison handles the unambiguous cases locally; only
//! on-behalf-of creation is delegated to the external policy decision
//! point, and any failure reaching it resolves to denial.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{Caller, SubjectIdentifier};
use crate::domain::subscription::{Subscription, SubscriptionRequest};
use crate::ports::PolicyDecisionPoint;

use super::attributes::subject_attributes;
use super::decision::{AuthzDecision, DecisionRequest, DenialReason, PolicyDecision, PolicyError};

/// Decides whether an authenticated caller may act on a subscription.
pub struct AuthorizationGate {
    pdp: Arc<dyn PolicyDecisionPoint>,
}

impl AuthorizationGate {
    pub fn new(pdp: Arc<dyn PolicyDecisionPoint>) -> Self {
        Self { pdp }
    }

    /// Authorizes creation of a new subscription.
    ///
    /// Allowed outright when the declared consumer is the caller itself.
    /// Otherwise the caller must hold a delegation for the subject named
    /// in the request, which only the policy decision point can confirm.
    /// Subjects that map to no attributes cannot be positively identified
    /// and are denied without consulting the engine.
    pub async fn authorize_create(
        &self,
        caller: &Caller,
        request: &SubscriptionRequest,
    ) -> AuthzDecision {
        if request.consumer == caller.identity() {
            return AuthzDecision::Allowed;
        }

        let Some(subject) = request.driving_subject() else {
            warn!(
                caller = caller.identity(),
                consumer = %request.consumer,
                "create denied: consumer mismatch and no subject to delegate on"
            );
            return AuthzDecision::Denied(DenialReason::Unauthorized);
        };

        let subject_category = subject_attributes(&SubjectIdentifier::parse(subject));
        let caller_category = subject_attributes(&caller.subject());
        if subject_category.is_empty() || caller_category.is_empty() {
            warn!(
                caller = caller.identity(),
                subject, "create denied: non-resolvable subject or caller"
            );
            return AuthzDecision::Denied(DenialReason::Unauthorized);
        }

        let decision_request = DecisionRequest::subscribe(caller_category, subject_category);
        match self.pdp.authorize(decision_request).await {
            Ok(PolicyDecision::Permit) => AuthzDecision::Allowed,
            Ok(PolicyDecision::Deny) | Ok(PolicyDecision::Indeterminate) => {
                warn!(
                    caller = caller.identity(),
                    subject, "create denied by policy decision point"
                );
                AuthzDecision::Denied(DenialReason::PolicyDenied)
            }
            Err(PolicyError::Unavailable(message)) => {
                warn!(
                    caller = caller.identity(),
                    error = %message,
                    "policy decision point unreachable, failing closed"
                );
                AuthzDecision::Denied(DenialReason::PolicyUnavailable(message))
            }
        }
    }

    /// Authorizes read or delete of an existing subscription.
    ///
    /// Exact string comparison of the normalized caller identity against
    /// `created_by`; no prefix or case-insensitive matching.
    pub fn authorize_access(&self, caller: &Caller, subscription: &Subscription) -> AuthzDecision {
        if subscription.is_created_by(caller.identity()) {
            AuthzDecision::Allowed
        } else {
            warn!(
                caller = caller.identity(),
                subscription = %subscription.id,
                "access denied: caller did not create this subscription"
            );
            AuthzDecision::Denied(DenialReason::Unauthorized)
        }
    }

    /// Authorizes listing subscriptions for a consumer.
    ///
    /// Only the caller's own identity may be listed.
    pub fn authorize_list(&self, caller: &Caller, consumer: &str) -> AuthzDecision {
        if consumer.trim() == caller.identity() {
            AuthzDecision::Allowed
        } else {
            AuthzDecision::Denied(DenialReason::Unauthorized)
        }
    }

    /// Drops every subscription whose consumer differs from the requested
    /// one. Applied on top of store results so an over-inclusive query can
    /// never leak a foreign subscription.
    pub fn filter_owned(consumer: &str, subscriptions: Vec<Subscription>) -> Vec<Subscription> {
        let consumer = consumer.trim();
        subscriptions
            .into_iter()
            .filter(|s| s.consumer == consumer)
            .collect()
    }
}
