//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionStore` - persistence for subscription records
//! - `PolicyDecisionPoint` - external attribute-based access decisions

mod policy_decision;
mod subscription_store;

pub use policy_decision::PolicyDecisionPoint;
pub use subscription_store::{StoreError, SubscriptionStore};
