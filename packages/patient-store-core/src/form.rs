//! Client-side Patient construction and the stricter client validation.
//!
//! Front-ends build documents from a handful of form fields and check them
//! with [`validate_strict`] before submitting. The server itself only applies
//! [`crate::validation::validate`].

use serde_json::Value;

use crate::error::ValidationError;
use crate::resource::{
    field, is_set, Address, ContactPoint, Gender, HumanName, Identifier, PatientDocument,
    Resource,
};
use crate::validation::{check_gender, patient_object, set_field};

/// Form fields that must be filled before a Patient can be built.
pub const REQUIRED_FIELDS: [&str; 3] = ["given", "family", "gender"];

/// Flat form input for a Patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub given: String,
    pub family: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub active: bool,
}

impl PatientForm {
    /// Names of required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.given.trim().is_empty() {
            missing.push(REQUIRED_FIELDS[0]);
        }
        if self.family.trim().is_empty() {
            missing.push(REQUIRED_FIELDS[1]);
        }
        if self.gender.is_none() {
            missing.push(REQUIRED_FIELDS[2]);
        }
        missing
    }

    /// Builds the Patient document for this form.
    ///
    /// When `id` is given the document carries it as its first identifier,
    /// which is what an update request expects.
    pub fn build(&self, id: Option<u64>) -> Resource {
        let mut telecom = Vec::new();
        if let Some(phone) = non_empty(&self.phone) {
            telecom.push(ContactPoint {
                system: "phone".to_string(),
                value: phone.to_string(),
            });
        }
        if let Some(email) = non_empty(&self.email) {
            telecom.push(ContactPoint {
                system: "email".to_string(),
                value: email.to_string(),
            });
        }

        let address = non_empty(&self.address)
            .map(|line| {
                vec![Address {
                    line: vec![line.to_string()],
                    ..Default::default()
                }]
            })
            .unwrap_or_default();

        PatientDocument {
            identifier: id
                .map(|id| {
                    vec![Identifier {
                        value: id.to_string(),
                    }]
                })
                .unwrap_or_default(),
            active: Some(self.active),
            name: vec![HumanName {
                given: vec![self.given.clone()],
                family: Some(self.family.clone()),
            }],
            telecom,
            gender: self.gender,
            birth_date: non_empty(&self.birth_date).map(str::to_string),
            address,
            ..Default::default()
        }
        .into_resource()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Sample document offered as a starting point in JSON editors.
pub fn template() -> Resource {
    PatientDocument {
        active: Some(true),
        name: vec![HumanName {
            given: vec!["João".to_string()],
            family: Some("Silva".to_string()),
        }],
        telecom: vec![
            ContactPoint {
                system: "phone".to_string(),
                value: "(11) 99999-9999".to_string(),
            },
            ContactPoint {
                system: "email".to_string(),
                value: "joao.silva@email.com".to_string(),
            },
        ],
        gender: Some(Gender::Male),
        birth_date: Some("1990-01-01".to_string()),
        address: vec![Address {
            line: vec!["Rua das Flores, 123".to_string()],
            city: Some("Porto Alegre".to_string()),
            state: Some("RS".to_string()),
            postal_code: Some("90000-000".to_string()),
        }],
        ..Default::default()
    }
    .into_resource()
}

/// Validates a document with the client rules.
///
/// On top of the object and `resourceType` checks this requires a first name
/// with given and family parts and a known gender. Identifier shape is left
/// to the server.
pub fn validate_strict(candidate: Option<&Value>) -> Result<&Resource, ValidationError> {
    let resource = patient_object(candidate)?;

    let first_name = resource
        .get(field::NAME)
        .and_then(Value::as_array)
        .and_then(|names| names.first())
        .ok_or(ValidationError::MissingName)?;

    let has_given = first_name
        .get("given")
        .and_then(Value::as_array)
        .is_some_and(|given| !given.is_empty());
    if !has_given {
        return Err(ValidationError::MissingGiven);
    }

    if !first_name.get("family").is_some_and(is_set) {
        return Err(ValidationError::MissingFamily);
    }

    let gender = set_field(resource, field::GENDER).ok_or(ValidationError::MissingGender)?;
    check_gender(gender)?;

    Ok(resource)
}
