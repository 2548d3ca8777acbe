//! Authorization - attribute mapping, decision types and the gate.

mod attributes;
mod decision;
mod gate;

pub use attributes::{
    subject_attributes, AttributeCategory, AttributeValueType, IdentityAttribute,
};
pub use decision::{AuthzDecision, DecisionRequest, DenialReason, PolicyDecision, PolicyError};
pub use gate::AuthorizationGate;
