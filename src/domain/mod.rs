//! Domain layer - subscription model, validation and authorization logic.
//!
//! Pure business rules with no knowledge of transports or storage engines.
//! Persistence and the external policy decision point are reached through
//! the ports defined in `crate::ports`.

pub mod authorization;
pub mod foundation;
pub mod subscription;
