//! Response types and helpers for HTTP endpoints.

use hyper::StatusCode;
use serde::Serialize;

/// Message for 404s on paths no route serves.
pub const ENDPOINT_NOT_FOUND: &str = "The requested endpoint was not found";

/// Message for failures no handler anticipated.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Message for bodies that cannot be turned into a Patient record.
pub const INVALID_PATIENT_FORMAT: &str = "Invalid patient data format";

/// Uniform error body: `{"error": <category>, "message": <text>}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error category (HTTP reason phrase)
    pub error: String,
    /// Human readable explanation
    pub message: String,
}

/// Helper to create error response
pub fn error_response(status: u16, message: impl Into<String>) -> ErrorResponse {
    let category = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Error");
    ErrorResponse {
        error: category.to_string(),
        message: message.into(),
    }
}
