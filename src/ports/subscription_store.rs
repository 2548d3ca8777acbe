//! Subscription persistence port.
//!
//! All operations are assumed atomic and strongly consistent
//! (read-your-writes). Identifier allocation happens inside the store;
//! concurrent inserts may race for ids without coordination here.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::subscription::{Subscription, SubscriptionId, SubscriptionRequest};

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No subscription exists with the given identifier.
    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),

    /// The underlying storage engine failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn database(message: impl Into<String>) -> Self {
        StoreError::Database(message.into())
    }
}

/// Persistence port for subscription records.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Inserts a new subscription with `validated = false`, assigning the
    /// identifier and creation timestamp.
    async fn insert(
        &self,
        request: &SubscriptionRequest,
        created_by: &str,
    ) -> Result<Subscription, StoreError>;

    /// Fetches a subscription by id. Returns `None` when absent.
    async fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError>;

    /// Permanently deletes a subscription.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist (or was already deleted).
    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError>;

    /// Marks a subscription as validated. Idempotent: marking an already
    /// validated subscription succeeds without change.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist.
    async fn mark_validated(&self, id: SubscriptionId) -> Result<(), StoreError>;

    /// Lists subscriptions owned by a consumer. Unvalidated entries are
    /// included only when `include_invalid` is set (owner visibility into
    /// pending confirmations).
    async fn query_by_consumer(
        &self,
        consumer: &str,
        include_invalid: bool,
    ) -> Result<Vec<Subscription>, StoreError>;

    /// Returns validated subscriptions matching an incoming event on the
    /// general delivery path. Org-owned subscriptions are excluded; they
    /// are resolved through a separate org-targeted path.
    async fn query_eligible_excluding_orgs(
        &self,
        source: &str,
        subject: Option<&str>,
        type_filter: Option<&str>,
    ) -> Result<Vec<Subscription>, StoreError>;
}
