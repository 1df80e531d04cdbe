//! Assembles the stored record from a validated document.
//!
//! The stored record starts from the skeleton
//! `{"resourceType": "Patient", "identifier": [{"value": "<id>"}]}`; submitted
//! fields are then copied one by one in submission order, and finally the
//! first identifier value is forced back to the canonical id.

use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::resource::{field, Resource, RESOURCE_TYPE};

/// Builds the record stored under `id` from a validated document.
///
/// A submitted `resourceType` or `identifier` replaces the skeleton value
/// without moving its key. Extra identifier entries are kept; an empty or
/// unset `identifier` is replaced by the skeleton entry.
///
/// # Errors
/// `BuildError::MalformedIdentifier` when `identifier[0]` is not an object.
pub fn build_record(id: u64, submitted: &Resource) -> Result<Resource, BuildError> {
    let canonical = id.to_string();

    let mut record = Resource::new();
    record.insert(
        field::RESOURCE_TYPE.to_string(),
        Value::String(RESOURCE_TYPE.to_string()),
    );
    record.insert(field::IDENTIFIER.to_string(), skeleton_identifier(&canonical));

    for (key, value) in submitted {
        record.insert(key.clone(), value.clone());
    }

    match record.get_mut(field::IDENTIFIER) {
        Some(Value::Array(entries)) => match entries.first_mut() {
            Some(Value::Object(first)) => {
                first.insert(field::VALUE.to_string(), Value::String(canonical));
            }
            Some(_) => return Err(BuildError::MalformedIdentifier),
            None => entries.push(identifier_entry(canonical)),
        },
        _ => {
            record.insert(field::IDENTIFIER.to_string(), skeleton_identifier(&canonical));
        }
    }

    Ok(record)
}

/// Extracts the id a client put in `identifier[0].value`, if any.
///
/// String values yield their leading decimal integer (after optional
/// whitespace and sign); numbers are truncated. Anything else, including a
/// missing value, yields `None`.
///
/// # Errors
/// `BuildError::MalformedIdentifier` when `identifier[0]` is not an object.
pub fn body_identifier(submitted: &Resource) -> Result<Option<i64>, BuildError> {
    let first = match submitted.get(field::IDENTIFIER).and_then(Value::as_array) {
        Some(entries) => match entries.first() {
            Some(entry) => entry,
            None => return Ok(None),
        },
        None => return Ok(None),
    };

    let entry = first.as_object().ok_or(BuildError::MalformedIdentifier)?;
    Ok(entry.get(field::VALUE).and_then(leading_integer))
}

fn skeleton_identifier(canonical: &str) -> Value {
    Value::Array(vec![identifier_entry(canonical.to_string())])
}

fn identifier_entry(canonical: String) -> Value {
    let mut entry = Map::new();
    entry.insert(field::VALUE.to_string(), Value::String(canonical));
    Value::Object(entry)
}

fn leading_integer(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_leading_integer(s),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    }
}

fn parse_leading_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }

    // Saturate instead of failing so oversized ids still compare unequal
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Resource {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn skeleton_comes_first_and_id_is_assigned() {
        let submitted = object(json!({
            "name": [{"given": ["Ana"], "family": "Souza"}],
            "gender": "female"
        }));
        let record = build_record(1, &submitted).unwrap();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"resourceType":"Patient","identifier":[{"value":"1"}],"name":[{"given":["Ana"],"family":"Souza"}],"gender":"female"}"#
        );
    }

    #[test]
    fn client_identifier_is_overwritten_but_extra_entries_survive() {
        let submitted = object(json!({
            "resourceType": "Patient",
            "identifier": [{"value": "99", "system": "mrn"}, {"value": "abc"}]
        }));
        let record = build_record(7, &submitted).unwrap();
        assert_eq!(
            record["identifier"],
            json!([{"value": "7", "system": "mrn"}, {"value": "abc"}])
        );
    }

    #[test]
    fn empty_identifier_gets_the_canonical_entry() {
        let submitted = object(json!({"resourceType": "Patient", "identifier": []}));
        let record = build_record(3, &submitted).unwrap();
        assert_eq!(record["identifier"], json!([{"value": "3"}]));

        let submitted = object(json!({"resourceType": "Patient", "identifier": null}));
        let record = build_record(4, &submitted).unwrap();
        assert_eq!(record["identifier"], json!([{"value": "4"}]));
    }

    #[test]
    fn non_object_identifier_entry_is_malformed() {
        let submitted = object(json!({"resourceType": "Patient", "identifier": [null]}));
        assert_eq!(
            build_record(1, &submitted),
            Err(BuildError::MalformedIdentifier)
        );
        assert_eq!(
            body_identifier(&submitted),
            Err(BuildError::MalformedIdentifier)
        );
    }

    #[test]
    fn body_identifier_reads_leading_integer() {
        let id = |v: Value| body_identifier(&object(json!({"identifier": [{"value": v}]}))).unwrap();
        assert_eq!(id(json!("12")), Some(12));
        assert_eq!(id(json!(" 12abc")), Some(12));
        assert_eq!(id(json!("-3")), Some(-3));
        assert_eq!(id(json!(4.9)), Some(4));
        assert_eq!(id(json!("abc")), None);
        assert_eq!(id(json!("")), None);
        assert_eq!(id(json!(true)), None);
    }

    #[test]
    fn body_identifier_absent_cases() {
        assert_eq!(body_identifier(&object(json!({}))).unwrap(), None);
        assert_eq!(body_identifier(&object(json!({"identifier": []}))).unwrap(), None);
        assert_eq!(body_identifier(&object(json!({"identifier": [{}]}))).unwrap(), None);
    }
}
