//! Error types for validation, record building and store access.

use thiserror::Error;

/// Reasons a candidate Patient document is rejected.
///
/// The display strings are part of the HTTP contract and are returned
/// verbatim in the `message` field of 400 responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Candidate missing or not a JSON object
    #[error("Patient must be a valid object")]
    NotAnObject,

    /// `resourceType` is not "Patient"
    #[error("Resource type must be \"Patient\"")]
    WrongResourceType,

    /// `identifier` present but not an array
    #[error("Identifier must be an array")]
    IdentifierNotArray,

    /// `name` present but not an array
    #[error("Name must be an array")]
    NameNotArray,

    /// `gender` outside the administrative gender codes
    #[error("Gender must be one of: male, female, other, unknown")]
    InvalidGender,

    /// No entry in `name`
    #[error("Patient must have at least one name")]
    MissingName,

    /// First name has no given names
    #[error("Patient name must include given name(s)")]
    MissingGiven,

    /// First name has no family name
    #[error("Patient name must include family name")]
    MissingFamily,

    /// `gender` absent
    #[error("Patient must have gender specified")]
    MissingGender,
}

/// Failures while assembling the stored record from a validated document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// `identifier[0]` exists but is not an object
    #[error("Identifier entry at index 0 must be an object")]
    MalformedIdentifier,
}

/// Resource store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// The id counter cannot advance any further
    #[error("Patient id space exhausted")]
    IdSpaceExhausted,

    /// Record builder rejected the document
    #[error(transparent)]
    Build(#[from] BuildError),
}
