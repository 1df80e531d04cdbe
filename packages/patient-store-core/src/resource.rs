//! Patient resource model.
//!
//! Stored records are kept as JSON objects so that fields the service does
//! not interpret (`birthDate`, `telecom`, `address`, extensions) pass through
//! untouched and in their submitted order. The typed structs below are used
//! where the service itself produces documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Patient document as stored and returned by the API.
pub type Resource = Map<String, Value>;

/// The only accepted `resourceType`.
pub const RESOURCE_TYPE: &str = "Patient";

/// Top-level field names.
pub mod field {
    pub const RESOURCE_TYPE: &str = "resourceType";
    pub const IDENTIFIER: &str = "identifier";
    pub const NAME: &str = "name";
    pub const GENDER: &str = "gender";
    pub const BIRTH_DATE: &str = "birthDate";
    pub const TELECOM: &str = "telecom";
    pub const ADDRESS: &str = "address";
    pub const ACTIVE: &str = "active";
    /// Key inside an identifier entry
    pub const VALUE: &str = "value";
}

/// Administrative gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Gender {
    /// Every accepted code, in the order used by error messages.
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Other, Gender::Unknown];

    /// Wire code for this gender.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| format!("unknown gender code '{}'", s))
    }
}

/// Identifier entry; the first one carries the store id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
}

/// Human name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// Contact point such as a phone number or e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// A Patient document produced by the service's own builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDocument {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

impl Default for PatientDocument {
    fn default() -> Self {
        Self {
            resource_type: RESOURCE_TYPE.to_string(),
            identifier: Vec::new(),
            active: None,
            name: Vec::new(),
            telecom: Vec::new(),
            gender: None,
            birth_date: None,
            address: Vec::new(),
        }
    }
}

impl PatientDocument {
    /// Converts the document into its JSON object form.
    pub fn into_resource(self) -> Resource {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // Serializing a plain struct always yields an object
            _ => Resource::new(),
        }
    }
}

/// Whether a JSON value counts as "set" for optional-field checks.
///
/// `null`, `false`, `0` and the empty string are treated as absent.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
