//! Core of the Patient service.
//!
//! Provides the FHIR-flavored Patient resource model, structural validation,
//! the canonical record builder, and the process-local resource store.
//! Client-side form building and display formatting live here as well so
//! that every front-end shares a single set of rules.

pub mod builder;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod resource;
pub mod store;
pub mod validation;

pub use resource::{Gender, Resource};
pub use store::PatientStore;
