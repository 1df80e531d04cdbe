//! Human-readable rendering of stored Patient records.

use serde_json::Value;

use crate::resource::{field, Gender, Resource};

const NAME_MISSING: &str = "Name not provided";
const ADDRESS_MISSING: &str = "Address not provided";
const NOT_PROVIDED: &str = "Not provided";

/// Display label for a gender code; unknown codes are shown as-is.
pub fn gender_label(code: &str) -> String {
    match code.parse::<Gender>() {
        Ok(Gender::Male) => "Male".to_string(),
        Ok(Gender::Female) => "Female".to_string(),
        Ok(Gender::Other) => "Other".to_string(),
        Ok(Gender::Unknown) => NOT_PROVIDED.to_string(),
        Err(_) => code.to_string(),
    }
}

/// Formats an ISO `YYYY-MM-DD` date as `DD/MM/YYYY`.
///
/// Values that are not plain calendar dates are returned unchanged.
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = date.filter(|d| !d.is_empty()) else {
        return NOT_PROVIDED.to_string();
    };
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day]
            if year.len() == 4
                && month.len() == 2
                && day.len() == 2
                && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) =>
        {
            format!("{}/{}/{}", day, month, year)
        }
        _ => date.to_string(),
    }
}

/// Full name from the first `name` entry: given names followed by family.
pub fn patient_name(patient: &Resource) -> String {
    let Some(name) = first_entry(patient, field::NAME) else {
        return NAME_MISSING.to_string();
    };

    let given = name
        .get("given")
        .and_then(Value::as_array)
        .map(|given| {
            given
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    let family = name.get("family").and_then(Value::as_str).unwrap_or("");

    let full = format!("{} {}", given, family).trim().to_string();
    if full.is_empty() {
        NAME_MISSING.to_string()
    } else {
        full
    }
}

/// First contact value for the given telecom system (`phone`, `email`, ...).
pub fn contact(patient: &Resource, system: &str) -> Option<String> {
    patient
        .get(field::TELECOM)?
        .as_array()?
        .iter()
        .find(|entry| entry.get("system").and_then(Value::as_str) == Some(system))
        .and_then(|entry| entry.get("value"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First address joined as `line, city, state, postalCode`.
pub fn address(patient: &Resource) -> String {
    let Some(addr) = first_entry(patient, field::ADDRESS) else {
        return ADDRESS_MISSING.to_string();
    };

    let mut parts: Vec<&str> = addr
        .get("line")
        .and_then(Value::as_array)
        .map(|lines| lines.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    for key in ["city", "state", "postalCode"] {
        if let Some(part) = addr.get(key).and_then(Value::as_str) {
            parts.push(part);
        }
    }

    let joined = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        ADDRESS_MISSING.to_string()
    } else {
        joined
    }
}

/// Multi-line summary used by list and detail views.
pub fn summary(patient: &Resource) -> String {
    let id = first_entry(patient, field::IDENTIFIER)
        .and_then(|entry| entry.get(field::VALUE))
        .and_then(Value::as_str)
        .unwrap_or("?");
    let gender = patient
        .get(field::GENDER)
        .and_then(Value::as_str)
        .map(gender_label)
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let birth_date = format_date(patient.get(field::BIRTH_DATE).and_then(Value::as_str));

    let phone = contact(patient, "phone").unwrap_or_else(|| NOT_PROVIDED.to_string());
    let email = contact(patient, "email").unwrap_or_else(|| NOT_PROVIDED.to_string());

    let mut out = format!("#{} {}\n", id, patient_name(patient));
    out.push_str(&format!("  Gender:     {}\n", gender));
    out.push_str(&format!("  Birth date: {}\n", birth_date));
    out.push_str(&format!("  Phone:      {}\n", phone));
    out.push_str(&format!("  Email:      {}\n", email));
    out.push_str(&format!("  Address:    {}", address(patient)));
    out
}

fn first_entry<'a>(patient: &'a Resource, key: &str) -> Option<&'a Value> {
    patient.get(key)?.as_array()?.first()
}
