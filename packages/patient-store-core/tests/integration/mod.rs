//! Integration test suite for the Patient store.
//!
//! 1. Store lifecycle (validate, build, store, replace, delete)
//! 2. Concurrent access through a shared store

mod concurrency_tests;
mod lifecycle_tests;
