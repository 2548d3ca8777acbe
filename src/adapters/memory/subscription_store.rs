//! In-memory subscription store for testing.
//!
//! Provides synchronous, deterministic persistence for unit and
//! integration tests.
//!
//! # Security Note
//!
//! This adapter is for **testing and local development only**. It uses
//! `.expect()` on lock operations which will panic if locks are poisoned.
//! Production code should use the Postgres store adapter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::foundation::SubjectIdentifier;
use crate::domain::subscription::{Subscription, SubscriptionId, SubscriptionRequest};
use crate::ports::{StoreError, SubscriptionStore};

/// In-memory implementation of `SubscriptionStore`.
///
/// Identifiers are allocated from an atomic counter and never reused,
/// mirroring the sequence-backed allocation of the real store.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. Acceptable for test
/// code; do NOT use in production.
pub struct InMemorySubscriptionStore {
    subscriptions: RwLock<BTreeMap<i64, Subscription>>,
    next_id: AtomicI64,
}

impl InMemorySubscriptionStore {
    /// Creates an empty store with ids starting at 1.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored subscriptions (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.subscriptions
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .len()
    }

    /// True when the store holds no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert(
        &self,
        request: &SubscriptionRequest,
        created_by: &str,
    ) -> Result<Subscription, StoreError> {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let subscription = Subscription::from_request(id, request, created_by, Utc::now());

        self.subscriptions
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .insert(id.as_i64(), subscription.clone());

        Ok(subscription)
    }

    async fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .get(&id.as_i64())
            .cloned())
    }

    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.subscriptions
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn mark_validated(&self, id: SubscriptionId) -> Result<(), StoreError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned");

        match subscriptions.get_mut(&id.as_i64()) {
            Some(subscription) => {
                subscription.validated = true;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn query_by_consumer(
        &self,
        consumer: &str,
        include_invalid: bool,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .values()
            .filter(|s| s.consumer == consumer)
            .filter(|s| include_invalid || s.validated)
            .cloned()
            .collect())
    }

    async fn query_eligible_excluding_orgs(
        &self,
        source: &str,
        subject: Option<&str>,
        type_filter: Option<&str>,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .values()
            .filter(|s| s.validated)
            .filter(|s| !SubjectIdentifier::parse(&s.consumer).is_org())
            .filter(|s| s.source_filter.as_str() == source)
            .filter(|s| s.subject_filter.is_none() || s.subject_filter.as_deref() == subject)
            .filter(|s| s.type_filter.is_none() || s.type_filter.as_deref() == type_filter)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(consumer: &str) -> SubscriptionRequest {
        SubscriptionRequest::from_parts(
            "https://skd.apps.altinn.no/skd/flyttemelding",
            None,
            None,
            None,
            consumer,
            "https://www.skatteetaten.no/hook",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemorySubscriptionStore::new();

        let first = store.insert(&request("/user/1"), "/user/1").await.unwrap();
        let second = store.insert(&request("/user/1"), "/user/1").await.unwrap();

        assert_eq!(first.id, SubscriptionId::new(1));
        assert_eq!(second.id, SubscriptionId::new(2));
        assert!(!first.validated);
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = InMemorySubscriptionStore::new();

        let first = store.insert(&request("/user/1"), "/user/1").await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(&request("/user/1"), "/user/1").await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = InMemorySubscriptionStore::new();
        assert_eq!(store.get(SubscriptionId::new(99)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_not_found() {
        let store = InMemorySubscriptionStore::new();
        let id = SubscriptionId::new(99);
        assert_eq!(store.delete(id).await, Err(StoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn mark_validated_is_idempotent() {
        let store = InMemorySubscriptionStore::new();
        let sub = store.insert(&request("/user/1"), "/user/1").await.unwrap();

        store.mark_validated(sub.id).await.unwrap();
        store.mark_validated(sub.id).await.unwrap();

        assert!(store.get(sub.id).await.unwrap().unwrap().validated);
    }

    #[tokio::test]
    async fn mark_validated_on_unknown_id_is_not_found() {
        let store = InMemorySubscriptionStore::new();
        let id = SubscriptionId::new(7);
        assert_eq!(store.mark_validated(id).await, Err(StoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn query_by_consumer_hides_unvalidated_unless_requested() {
        let store = InMemorySubscriptionStore::new();
        let pending = store.insert(&request("/org/ttd"), "/org/ttd").await.unwrap();
        let confirmed = store.insert(&request("/org/ttd"), "/org/ttd").await.unwrap();
        store.mark_validated(confirmed.id).await.unwrap();

        let valid_only = store.query_by_consumer("/org/ttd", false).await.unwrap();
        assert_eq!(valid_only.len(), 1);
        assert_eq!(valid_only[0].id, confirmed.id);

        let all = store.query_by_consumer("/org/ttd", true).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|s| s.id == pending.id));
    }

    #[tokio::test]
    async fn eligibility_query_excludes_orgs_and_unvalidated() {
        let store = InMemorySubscriptionStore::new();
        let source = "https://skd.apps.altinn.no/skd/flyttemelding";

        let org = store.insert(&request("/org/skd"), "/org/skd").await.unwrap();
        store.mark_validated(org.id).await.unwrap();

        let pending_user = store.insert(&request("/user/2"), "/user/2").await.unwrap();

        let user = store.insert(&request("/user/1"), "/user/1").await.unwrap();
        store.mark_validated(user.id).await.unwrap();

        let eligible = store
            .query_eligible_excluding_orgs(source, None, None)
            .await
            .unwrap();

        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, user.id);
        assert_ne!(eligible[0].id, pending_user.id);
    }

    #[tokio::test]
    async fn eligibility_query_matches_subject_and_type() {
        let store = InMemorySubscriptionStore::new();
        let source = "https://skd.apps.altinn.no/skd/flyttemelding";

        let mut scoped = request("/user/1");
        scoped.subject_filter = Some("/party/512345".to_string());
        scoped.type_filter = Some("app.instance.created".to_string());
        let scoped = store.insert(&scoped, "/user/1").await.unwrap();
        store.mark_validated(scoped.id).await.unwrap();

        let hit = store
            .query_eligible_excluding_orgs(
                source,
                Some("/party/512345"),
                Some("app.instance.created"),
            )
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        let wrong_subject = store
            .query_eligible_excluding_orgs(source, Some("/party/5"), Some("app.instance.created"))
            .await
            .unwrap();
        assert!(wrong_subject.is_empty());

        let wrong_type = store
            .query_eligible_excluding_orgs(source, Some("/party/512345"), Some("app.instance.deleted"))
            .await
            .unwrap();
        assert!(wrong_type.is_empty());
    }
}
