//! Identity model shared by validation, authorization and matching.
//!
//! Subjects and consumers arrive as slash-delimited paths such as
//! `/user/1337`, `/org/ttd`, `/party/512345` or `/person/01039012345`.
//! A single parse function turns them into a tagged union so the rest of
//! the crate never dispatches on string prefixes directly.

use std::fmt;

use serde::{Deserialize, Serialize};

const USER_PREFIX: &str = "/user/";
const ORG_PREFIX: &str = "/org/";
const PARTY_PREFIX: &str = "/party/";
const PERSON_PREFIX: &str = "/person/";

/// A parsed subject or consumer identifier.
///
/// `User` and `Party` carry numeric platform identifiers, `Org` carries an
/// organisation code (kept as a string even when it looks numeric) and
/// `Person` carries a national identity number. Anything else, including a
/// recognised prefix with a malformed trailing value, is `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectIdentifier {
    User(i64),
    Org(String),
    Party(i64),
    Person(String),
    Unrecognized,
}

impl SubjectIdentifier {
    /// Parses a slash-delimited subject string.
    ///
    /// Never fails; inputs that do not match a known shape come back as
    /// `Unrecognized`, which downstream authorization treats as
    /// "cannot be positively identified" and therefore denies.
    pub fn parse(subject: &str) -> Self {
        let subject = subject.trim();

        if let Some(rest) = subject.strip_prefix(USER_PREFIX) {
            return match rest.parse::<i64>() {
                Ok(id) => SubjectIdentifier::User(id),
                Err(_) => SubjectIdentifier::Unrecognized,
            };
        }

        if let Some(rest) = subject.strip_prefix(ORG_PREFIX) {
            if rest.is_empty() || rest.contains('/') {
                return SubjectIdentifier::Unrecognized;
            }
            return SubjectIdentifier::Org(rest.to_string());
        }

        if let Some(rest) = subject.strip_prefix(PARTY_PREFIX) {
            return match rest.parse::<i64>() {
                Ok(id) => SubjectIdentifier::Party(id),
                Err(_) => SubjectIdentifier::Unrecognized,
            };
        }

        if let Some(rest) = subject.strip_prefix(PERSON_PREFIX) {
            if rest.is_empty() || rest.contains('/') {
                return SubjectIdentifier::Unrecognized;
            }
            return SubjectIdentifier::Person(rest.to_string());
        }

        SubjectIdentifier::Unrecognized
    }

    /// Returns true for organisation identifiers.
    ///
    /// Used by the delivery matcher, which excludes org-owned subscriptions
    /// from the general matching path.
    pub fn is_org(&self) -> bool {
        matches!(self, SubjectIdentifier::Org(_))
    }
}

impl fmt::Display for SubjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectIdentifier::User(id) => write!(f, "{}{}", USER_PREFIX, id),
            SubjectIdentifier::Org(code) => write!(f, "{}{}", ORG_PREFIX, code),
            SubjectIdentifier::Party(id) => write!(f, "{}{}", PARTY_PREFIX, id),
            SubjectIdentifier::Person(nin) => write!(f, "{}{}", PERSON_PREFIX, nin),
            SubjectIdentifier::Unrecognized => write!(f, "<unrecognized>"),
        }
    }
}

/// Classification of an authenticated caller, supplied by the transport
/// layer after token validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerClass {
    /// An end user acting on their own behalf.
    EndUser,
    /// An organisation or system identity.
    Organization,
    /// The platform's own internal delivery machinery.
    Platform,
}

/// An authenticated caller.
///
/// The identity string has already been validated upstream; this crate only
/// normalizes it (whitespace trim) and compares it. Token handling never
/// happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    identity: String,
    class: CallerClass,
}

impl Caller {
    /// Creates a caller with a normalized identity string.
    pub fn new(identity: impl Into<String>, class: CallerClass) -> Self {
        Self {
            identity: identity.into().trim().to_string(),
            class,
        }
    }

    /// The normalized identity string, e.g. `/org/ttd`.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The caller classification.
    pub fn class(&self) -> CallerClass {
        self.class
    }

    /// Parses the caller identity into a subject identifier.
    pub fn subject(&self) -> SubjectIdentifier {
        SubjectIdentifier::parse(&self.identity)
    }

    /// True for end-user callers (subject-filter requirement applies).
    pub fn is_end_user(&self) -> bool {
        self.class == CallerClass::EndUser
    }

    /// True for the platform's internal identity (may call validate).
    pub fn is_platform(&self) -> bool {
        self.class == CallerClass::Platform
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}
