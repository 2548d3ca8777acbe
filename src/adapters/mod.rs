//! Adapters - implementations of the ports.
//!
//! - `postgres` - sqlx-backed subscription store
//! - `memory` - in-memory subscription store for tests and development
//! - `pdp` - HTTP client and stub for the policy decision point

pub mod memory;
pub mod pdp;
pub mod postgres;
