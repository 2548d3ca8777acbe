//! Policy decision point adapters.

mod http;
mod stub;

pub use http::{HttpPolicyDecisionPoint, PdpConfig};
pub use stub::StubPolicyDecisionPoint;
