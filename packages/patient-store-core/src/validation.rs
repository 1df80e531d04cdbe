//! Structural validation of candidate Patient documents.

use serde_json::Value;

use crate::error::ValidationError;
use crate::resource::{field, is_set, Gender, Resource, RESOURCE_TYPE};

/// Validates a candidate document against the server-side rules.
///
/// Checks run in a fixed order and stop at the first failure:
/// object shape, `resourceType`, `identifier` array, `name` array, `gender`
/// code. `name` and `gender` are not required here.
///
/// # Returns
/// The candidate as an object map when it passes.
pub fn validate(candidate: Option<&Value>) -> Result<&Resource, ValidationError> {
    let resource = patient_object(candidate)?;

    if set_field(resource, field::IDENTIFIER).is_some_and(|v| !v.is_array()) {
        return Err(ValidationError::IdentifierNotArray);
    }

    if set_field(resource, field::NAME).is_some_and(|v| !v.is_array()) {
        return Err(ValidationError::NameNotArray);
    }

    if let Some(gender) = set_field(resource, field::GENDER) {
        check_gender(gender)?;
    }

    Ok(resource)
}

/// Checks that the candidate is an object whose `resourceType` is "Patient".
pub(crate) fn patient_object(candidate: Option<&Value>) -> Result<&Resource, ValidationError> {
    let resource = candidate
        .and_then(Value::as_object)
        .ok_or(ValidationError::NotAnObject)?;

    if resource.get(field::RESOURCE_TYPE).and_then(Value::as_str) != Some(RESOURCE_TYPE) {
        return Err(ValidationError::WrongResourceType);
    }
    Ok(resource)
}

/// Returns the field when it is present and set.
pub(crate) fn set_field<'a>(resource: &'a Resource, key: &str) -> Option<&'a Value> {
    resource.get(key).filter(|value| is_set(value))
}

pub(crate) fn check_gender(value: &Value) -> Result<(), ValidationError> {
    value
        .as_str()
        .and_then(|code| code.parse::<Gender>().ok())
        .map(|_| ())
        .ok_or(ValidationError::InvalidGender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(candidate: Value) -> String {
        validate(Some(&candidate)).unwrap_err().to_string()
    }

    #[test]
    fn missing_candidate_is_not_an_object() {
        assert_eq!(validate(None), Err(ValidationError::NotAnObject));
        assert_eq!(reason(json!("Patient")), "Patient must be a valid object");
        assert_eq!(reason(json!([1, 2])), "Patient must be a valid object");
    }

    #[test]
    fn resource_type_must_be_patient() {
        assert_eq!(
            reason(json!({"resourceType": "Person"})),
            "Resource type must be \"Patient\""
        );
        assert_eq!(reason(json!({})), "Resource type must be \"Patient\"");
    }

    #[test]
    fn identifier_and_name_must_be_arrays() {
        assert_eq!(
            reason(json!({"resourceType": "Patient", "identifier": {"value": "1"}})),
            "Identifier must be an array"
        );
        assert_eq!(
            reason(json!({"resourceType": "Patient", "name": "Ana"})),
            "Name must be an array"
        );
    }

    #[test]
    fn checks_run_in_order() {
        // identifier is checked before name and gender
        let candidate = json!({
            "resourceType": "Patient",
            "identifier": "x",
            "name": "y",
            "gender": "z"
        });
        assert_eq!(validate(Some(&candidate)), Err(ValidationError::IdentifierNotArray));
    }

    #[test]
    fn gender_must_be_a_known_code() {
        assert_eq!(
            reason(json!({"resourceType": "Patient", "gender": "MALE"})),
            "Gender must be one of: male, female, other, unknown"
        );
        assert_eq!(
            reason(json!({"resourceType": "Patient", "gender": 1})),
            "Gender must be one of: male, female, other, unknown"
        );
    }

    #[test]
    fn minimal_patient_passes() {
        let candidate = json!({"resourceType": "Patient"});
        assert!(validate(Some(&candidate)).is_ok());
    }

    #[test]
    fn unset_optional_fields_are_ignored() {
        let candidate = json!({
            "resourceType": "Patient",
            "identifier": null,
            "name": null,
            "gender": ""
        });
        assert!(validate(Some(&candidate)).is_ok());
    }
}
