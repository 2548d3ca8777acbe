//! In-memory adapters for tests and development.

mod subscription_store;

pub use subscription_store::InMemorySubscriptionStore;
