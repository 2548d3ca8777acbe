//! SubscriptionLifecycle - the public create/get/list/delete/validate
//! operations exposed to the transport layer.
//!
//! Orchestration only: every rule lives in the validator, the gate or the
//! store. Any denial short-circuits before any store mutation, so there
//! are no partial writes to roll back. Each operation is stateless;
//! decisions are rederived per request from persisted state.

use std::sync::Arc;

use tracing::info;

use crate::domain::authorization::{AuthorizationGate, DenialReason};
use crate::domain::foundation::Caller;
use crate::domain::subscription::{
    validate_subscription, Subscription, SubscriptionError, SubscriptionId, SubscriptionRequest,
};
use crate::ports::{PolicyDecisionPoint, SubscriptionStore};

/// Orchestrates the public subscription operations.
pub struct SubscriptionLifecycle {
    store: Arc<dyn SubscriptionStore>,
    gate: AuthorizationGate,
}

impl SubscriptionLifecycle {
    pub fn new(store: Arc<dyn SubscriptionStore>, pdp: Arc<dyn PolicyDecisionPoint>) -> Self {
        Self {
            store,
            gate: AuthorizationGate::new(pdp),
        }
    }

    /// Registers a new subscription in the pending state.
    ///
    /// Validator first, then the create gate, then the store; the record
    /// is stamped with the caller as `created_by` and starts unvalidated.
    pub async fn create(
        &self,
        request: SubscriptionRequest,
        caller: &Caller,
    ) -> Result<Subscription, SubscriptionError> {
        validate_subscription(&request, caller)?;
        self.gate.authorize_create(caller, &request).await.into_result()?;

        let subscription = self.store.insert(&request, caller.identity()).await?;
        info!(
            id = %subscription.id,
            consumer = %subscription.consumer,
            "subscription created"
        );
        Ok(subscription)
    }

    /// Fetches a subscription the caller created.
    ///
    /// Unknown ids are `NotFound`; existing subscriptions created by
    /// someone else are `Denied`, kept distinct so the transport layer can
    /// decide how much to reveal.
    pub async fn get(
        &self,
        id: SubscriptionId,
        caller: &Caller,
    ) -> Result<Subscription, SubscriptionError> {
        let subscription = self
            .store
            .get(id)
            .await?
            .ok_or(SubscriptionError::NotFound(id))?;

        self.gate.authorize_access(caller, &subscription).into_result()?;
        Ok(subscription)
    }

    /// Permanently deletes a subscription the caller created.
    pub async fn delete(
        &self,
        id: SubscriptionId,
        caller: &Caller,
    ) -> Result<(), SubscriptionError> {
        let subscription = self
            .store
            .get(id)
            .await?
            .ok_or(SubscriptionError::NotFound(id))?;

        self.gate.authorize_access(caller, &subscription).into_result()?;

        self.store.delete(id).await?;
        info!(id = %id, "subscription deleted");
        Ok(())
    }

    /// Lists the caller's own subscriptions.
    ///
    /// `include_invalid` lets the owner see pending (unvalidated) entries.
    /// Results are re-filtered by consumer even though the store query is
    /// already keyed on it; an over-inclusive store must never leak a
    /// foreign subscription.
    pub async fn list_by_consumer(
        &self,
        consumer: &str,
        caller: &Caller,
        include_invalid: bool,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        self.gate.authorize_list(caller, consumer).into_result()?;

        let subscriptions = self.store.query_by_consumer(consumer, include_invalid).await?;
        Ok(AuthorizationGate::filter_owned(consumer, subscriptions))
    }

    /// Marks a subscription as validated after its endpoint confirmation
    /// handshake.
    ///
    /// Platform-internal: invoked by the delivery machinery with a
    /// platform token, not subject to the `created_by` check. Idempotent.
    pub async fn validate(
        &self,
        id: SubscriptionId,
        caller: &Caller,
    ) -> Result<(), SubscriptionError> {
        if !caller.is_platform() {
            return Err(DenialReason::Unauthorized.into());
        }

        self.store.mark_validated(id).await?;
        info!(id = %id, "subscription validated");
        Ok(())
    }
}
