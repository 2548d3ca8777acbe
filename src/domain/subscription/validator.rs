//! Structural validation of subscription requests.
//!
//! A pure predicate over the request and the caller's identity class.
//! Authorization is a separate concern handled by the gate.

use crate::domain::foundation::Caller;

use super::errors::ValidationError;
use super::SubscriptionRequest;

/// Validates a subscription request before persistence.
///
/// Rules, all of which must hold:
/// - the source filter must not end with a path separator; a trailing `/`
///   would make later prefix matching ambiguous, so `.../flyttemelding/`
///   is rejected outright
/// - end-user callers must scope the subscription with a subject filter
///   (either field); organisations and platform callers may subscribe
///   unscoped
///
/// Absolute-URI parsing of source and endpoint happens when the request is
/// built (`SubscriptionRequest::from_parts`), so both URLs are already
/// well-formed here.
pub fn validate_subscription(
    request: &SubscriptionRequest,
    caller: &Caller,
) -> Result<(), ValidationError> {
    let source = request.source_filter.as_str();
    if source.ends_with('/') {
        return Err(ValidationError::invalid_source(
            source,
            "must not end with a path separator",
        ));
    }

    if caller.is_end_user() && request.driving_subject().is_none() {
        return Err(ValidationError::MissingSubjectForUser);
    }

    Ok(())
}
