//! Shared-store tests: many threads creating through one `Arc<PatientStore>`.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use ntest::timeout;
use serde_json::json;

use patient_store_core::builder::build_record;
use patient_store_core::validation::validate;
use patient_store_core::PatientStore;

/// Concurrent creates never hand out the same id twice
#[timeout(5000)]
#[test]
fn test_concurrent_creates_get_unique_ids() {
    let store = Arc::new(PatientStore::new());
    let threads = 8;
    let per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let body = json!({"resourceType": "Patient", "gender": "unknown"});
                let doc = validate(Some(&body)).unwrap().clone();
                (0..per_thread)
                    .map(|_| store.create(|id| build_record(id, &doc)).unwrap().0)
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "id {} assigned twice", id);
        }
    }

    let total = (threads * per_thread) as u64;
    assert_eq!(seen.len() as u64, total);
    assert_eq!(store.list_ids().unwrap(), (1..=total).collect::<Vec<_>>());
}

/// Each stored record carries its own key as the first identifier
#[timeout(5000)]
#[test]
fn test_identifier_matches_key_under_contention() {
    let store = Arc::new(PatientStore::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let body = json!({"resourceType": "Patient", "identifier": [{"value": "999"}]});
                let doc = validate(Some(&body)).unwrap().clone();
                for _ in 0..25 {
                    store.create(|id| build_record(id, &doc)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for id in store.list_ids().unwrap() {
        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record["identifier"][0]["value"], json!(id.to_string()));
    }
}
