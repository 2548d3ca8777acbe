//! Mapping of subject identifiers to policy-engine attributes.
//!
//! The policy decision point speaks the XACML JSON profile, so the wire
//! field names (`AttributeId`, `Value`, `DataType`, `Issuer`) are fixed by
//! that contract. Attributes are constructed transiently per decision and
//! never persisted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SubjectIdentifier;

const DEFAULT_ISSUER: &str = "Altinn";

const ATTRIBUTE_USER_ID: &str = "urn:altinn:userid";
const ATTRIBUTE_ORG: &str = "urn:altinn:org";
const ATTRIBUTE_PARTY_ID: &str = "urn:altinn:partyid";

/// XACML data type of an attribute value.
///
/// The policy comparison is value-type sensitive: numeric identifiers
/// (user, party) must be tagged integer, while organisation codes are
/// always strings even when they look numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValueType {
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#string")]
    String,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#integer")]
    Integer,
}

/// A single (category, value, value type, issuer) tuple describing a
/// subject to the policy engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAttribute {
    #[serde(rename = "AttributeId")]
    pub attribute_id: String,

    #[serde(rename = "Value")]
    pub value: String,

    #[serde(rename = "DataType")]
    pub data_type: AttributeValueType,

    #[serde(rename = "Issuer")]
    pub issuer: String,
}

impl IdentityAttribute {
    /// Creates an attribute with the fixed default issuer.
    pub fn new(
        attribute_id: impl Into<String>,
        value: impl Into<String>,
        data_type: AttributeValueType,
    ) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            value: value.into(),
            data_type,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// An XACML attribute category: a bag of attributes describing one actor
/// or resource in a decision request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCategory {
    #[serde(rename = "Attribute")]
    pub attribute: Vec<IdentityAttribute>,
}

impl AttributeCategory {
    /// Creates an empty category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a category holding a single attribute.
    pub fn single(attribute: IdentityAttribute) -> Self {
        Self {
            attribute: vec![attribute],
        }
    }

    /// Appends an attribute, builder style.
    pub fn with_attribute(mut self, attribute: IdentityAttribute) -> Self {
        self.attribute.push(attribute);
        self
    }

    /// True when the category carries no attributes.
    ///
    /// An empty category means the subject could not be positively
    /// identified; callers must resolve that to denial, never allow.
    pub fn is_empty(&self) -> bool {
        self.attribute.is_empty()
    }
}

/// Maps a parsed subject to its policy-engine attribute category.
///
/// Users and parties become integer-typed platform identifiers,
/// organisations become string-typed organisation codes. Person subjects
/// and unrecognized input yield an empty category rather than an error.
pub fn subject_attributes(subject: &SubjectIdentifier) -> AttributeCategory {
    match subject {
        SubjectIdentifier::User(id) => AttributeCategory::single(IdentityAttribute::new(
            ATTRIBUTE_USER_ID,
            id.to_string(),
            AttributeValueType::Integer,
        )),
        SubjectIdentifier::Org(code) => AttributeCategory::single(IdentityAttribute::new(
            ATTRIBUTE_ORG,
            code.clone(),
            AttributeValueType::String,
        )),
        SubjectIdentifier::Party(id) => AttributeCategory::single(IdentityAttribute::new(
            ATTRIBUTE_PARTY_ID,
            id.to_string(),
            AttributeValueType::Integer,
        )),
        SubjectIdentifier::Person(_) | SubjectIdentifier::Unrecognized => AttributeCategory::new(),
    }
}
