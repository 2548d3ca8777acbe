//! SubscriptionMatcher - delivery-time eligibility lookup.
//!
//! Given an incoming event's source, subject and type, returns the
//! subscriptions eligible for delivery on the general path. Org-owned
//! subscriptions are resolved through a separate org-targeted path and
//! never appear here. No ordering guarantee; fan-out is order-independent.

use std::sync::Arc;

use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionStore;

/// Matches incoming events against the subscription registry.
pub struct SubscriptionMatcher {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionMatcher {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Returns the validated subscriptions eligible for an event.
    ///
    /// The store query already excludes org consumers and unvalidated
    /// rows; the result is re-checked here against the real event fields
    /// so an over-inclusive query can never route an event to the wrong
    /// party.
    pub async fn find_eligible(
        &self,
        source: &str,
        subject: Option<&str>,
        type_name: Option<&str>,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let candidates = self
            .store
            .query_eligible_excluding_orgs(source, subject, type_name)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|s| Self::matches(s, source, subject, type_name))
            .collect())
    }

    fn matches(
        subscription: &Subscription,
        source: &str,
        subject: Option<&str>,
        type_name: Option<&str>,
    ) -> bool {
        if !subscription.validated || subscription.has_org_consumer() {
            return false;
        }
        if subscription.source_filter.as_str() != source {
            return false;
        }
        if let Some(filter) = subscription.subject_filter.as_deref() {
            if Some(filter) != subject {
                return false;
            }
        }
        if let Some(filter) = subscription.type_filter.as_deref() {
            if Some(filter) != type_name {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::domain::subscription::SubscriptionRequest;
    use crate::ports::StoreError;
    use async_trait::async_trait;
    use chrono::Utc;
    use crate::domain::subscription::SubscriptionId;

    const SOURCE: &str = "https://skd.apps.altinn.no/skd/flyttemelding";

    fn request(consumer: &str, subject: Option<&str>, type_filter: Option<&str>) -> SubscriptionRequest {
        SubscriptionRequest::from_parts(
            SOURCE,
            subject.map(str::to_string),
            None,
            type_filter.map(str::to_string),
            consumer,
            "https://www.skatteetaten.no/hook",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unvalidated_subscriptions_never_match() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        store.insert(&request("/user/1", None, None), "/user/1").await.unwrap();

        let matcher = SubscriptionMatcher::new(store);
        let eligible = matcher.find_eligible(SOURCE, None, None).await.unwrap();

        assert!(eligible.is_empty());
    }

    #[tokio::test]
    async fn validated_subscription_matches_after_confirmation() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let sub = store.insert(&request("/user/1", None, None), "/user/1").await.unwrap();
        store.mark_validated(sub.id).await.unwrap();

        let matcher = SubscriptionMatcher::new(store);
        let eligible = matcher
            .find_eligible(SOURCE, None, Some("app.instance.created"))
            .await
            .unwrap();

        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, sub.id);
    }

    #[tokio::test]
    async fn org_consumers_are_excluded_from_this_path() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let sub = store.insert(&request("/org/skd", None, None), "/org/skd").await.unwrap();
        store.mark_validated(sub.id).await.unwrap();

        let matcher = SubscriptionMatcher::new(store);
        let eligible = matcher.find_eligible(SOURCE, None, None).await.unwrap();

        assert!(eligible.is_empty());
    }

    #[tokio::test]
    async fn subject_filter_must_equal_event_subject() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let sub = store
            .insert(&request("/user/1", Some("/party/512345"), None), "/user/1")
            .await
            .unwrap();
        store.mark_validated(sub.id).await.unwrap();

        let matcher = SubscriptionMatcher::new(store);

        let hit = matcher
            .find_eligible(SOURCE, Some("/party/512345"), None)
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        let miss = matcher.find_eligible(SOURCE, Some("/party/5"), None).await.unwrap();
        assert!(miss.is_empty());

        let no_subject = matcher.find_eligible(SOURCE, None, None).await.unwrap();
        assert!(no_subject.is_empty());
    }

    #[tokio::test]
    async fn matcher_refilters_an_over_inclusive_store() {
        // The store hands back a row whose subject filter does not match
        // the real event subject; the matcher must drop it rather than
        // repeat the event subject back to itself.
        struct OverInclusiveStore;

        #[async_trait]
        impl SubscriptionStore for OverInclusiveStore {
            async fn insert(
                &self,
                _request: &SubscriptionRequest,
                _created_by: &str,
            ) -> Result<crate::domain::subscription::Subscription, StoreError> {
                unreachable!("not used in this test")
            }

            async fn get(
                &self,
                _id: SubscriptionId,
            ) -> Result<Option<crate::domain::subscription::Subscription>, StoreError> {
                Ok(None)
            }

            async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
                Err(StoreError::NotFound(id))
            }

            async fn mark_validated(&self, id: SubscriptionId) -> Result<(), StoreError> {
                Err(StoreError::NotFound(id))
            }

            async fn query_by_consumer(
                &self,
                _consumer: &str,
                _include_invalid: bool,
            ) -> Result<Vec<crate::domain::subscription::Subscription>, StoreError> {
                Ok(vec![])
            }

            async fn query_eligible_excluding_orgs(
                &self,
                _source: &str,
                _subject: Option<&str>,
                _type_filter: Option<&str>,
            ) -> Result<Vec<crate::domain::subscription::Subscription>, StoreError> {
                let mismatched = SubscriptionRequest::from_parts(
                    SOURCE,
                    Some("/party/99999".to_string()),
                    None,
                    None,
                    "/user/1",
                    "https://www.skatteetaten.no/hook",
                )
                .unwrap();
                let mut sub = crate::domain::subscription::Subscription::from_request(
                    SubscriptionId::new(1),
                    &mismatched,
                    "/user/1",
                    Utc::now(),
                );
                sub.validated = true;
                Ok(vec![sub])
            }
        }

        let matcher = SubscriptionMatcher::new(Arc::new(OverInclusiveStore));
        let eligible = matcher
            .find_eligible(SOURCE, Some("/party/512345"), None)
            .await
            .unwrap();

        assert!(eligible.is_empty());
    }
}
