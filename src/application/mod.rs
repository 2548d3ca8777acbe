//! Application layer - orchestration of validator, gate and store.

mod delivery;
mod subscriptions;

pub use delivery::SubscriptionMatcher;
pub use subscriptions::SubscriptionLifecycle;
