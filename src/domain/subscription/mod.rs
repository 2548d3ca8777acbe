//! Subscription entity, request shape and structural validation.

mod errors;
mod subscription;
mod validator;

pub use errors::{SubscriptionError, ValidationError};
pub use subscription::{Subscription, SubscriptionId, SubscriptionRequest};
pub use validator::validate_subscription;
