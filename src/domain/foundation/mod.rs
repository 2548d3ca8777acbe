//! Foundation types shared across the domain layer.

mod identity;

pub use identity::{Caller, CallerClass, SubjectIdentifier};
