//! Store lifecycle tests driving validation, the record builder and the store
//! together the way the request handlers do.

use ntest::timeout;
use serde_json::{json, Value};

use patient_store_core::builder::{body_identifier, build_record};
use patient_store_core::error::{BuildError, StoreError, ValidationError};
use patient_store_core::validation::validate;
use patient_store_core::PatientStore;

fn create(store: &PatientStore, body: Value) -> Result<(u64, Value), String> {
    let submitted = validate(Some(&body)).map_err(|e| e.to_string())?;
    store
        .create(|id| build_record(id, submitted))
        .map(|(id, record)| (id, Value::Object(record)))
        .map_err(|e| e.to_string())
}

/// Create → read → replace → delete for a single record
#[timeout(1000)]
#[test]
fn test_full_lifecycle() {
    let store = PatientStore::new();

    let (id, created) = create(
        &store,
        json!({
            "resourceType": "Patient",
            "name": [{"given": ["Ana"], "family": "Souza"}],
            "gender": "female"
        }),
    )
    .unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        serde_json::to_string(&created).unwrap(),
        r#"{"resourceType":"Patient","identifier":[{"value":"1"}],"name":[{"given":["Ana"],"family":"Souza"}],"gender":"female"}"#
    );

    // Reading back yields the same document
    let read = store.get(id).unwrap().unwrap();
    assert_eq!(Value::Object(read), created);

    // Replace wholesale: fields missing from the update are gone
    let update = json!({
        "resourceType": "Patient",
        "identifier": [{"value": "1"}],
        "gender": "other"
    });
    let submitted = validate(Some(&update)).unwrap();
    assert_eq!(body_identifier(submitted), Ok(Some(1)));
    let replaced = store.put(id, build_record(id, submitted).unwrap()).unwrap();
    assert!(replaced.get("name").is_none());
    assert_eq!(replaced["gender"], json!("other"));

    assert!(store.delete(id).unwrap());
    assert_eq!(store.get(id).unwrap(), None);
    assert!(store.is_empty().unwrap());
}

/// Rejected documents never reach the store or consume ids
#[timeout(1000)]
#[test]
fn test_rejections_leave_store_untouched() {
    let store = PatientStore::new();

    assert_eq!(
        create(&store, json!({"resourceType": "Person"})).unwrap_err(),
        ValidationError::WrongResourceType.to_string()
    );
    assert_eq!(
        create(&store, json!({"resourceType": "Patient", "identifier": ["x"]})).unwrap_err(),
        StoreError::Build(BuildError::MalformedIdentifier).to_string()
    );
    assert_eq!(store.len().unwrap(), 0);

    let (id, _) = create(&store, json!({"resourceType": "Patient"})).unwrap();
    assert_eq!(id, 1);
}

/// Listing order does not depend on insertion order
#[timeout(1000)]
#[test]
fn test_listing_is_sorted() {
    let store = PatientStore::new();
    for _ in 0..5 {
        create(&store, json!({"resourceType": "Patient"})).unwrap();
    }
    assert!(store.delete(2).unwrap());
    let doc = validate(Some(&json!({"resourceType": "Patient"}))).unwrap().clone();
    store.put(2, build_record(2, &doc).unwrap()).unwrap();

    assert_eq!(store.list_ids().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(store.next_id().unwrap(), 6);
}
