//! Events Subscriptions - subscription management and delivery
//! authorization for a cloud-events platform.
//!
//! External parties register webhook subscriptions scoped by event source,
//! subject and type; incoming events are later matched against the
//! registry to decide who receives them. This crate owns the subscription
//! data model, its persistence contract, and the authorization gate that
//! keeps callers from registering subscriptions for events they are not
//! entitled to see. HTTP transport, token validation and the policy
//! decision engine itself live outside, behind the ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
