//! HTTP endpoint implementations for the Patient API and the front-end.

mod patient_handlers;
pub mod request_utils;
pub mod response;
mod static_handlers;

pub use patient_handlers::{
    create_patient, delete_patient, list_patient_ids, read_patient, update_patient,
};
pub use response::{
    error_response, ErrorResponse, ENDPOINT_NOT_FOUND, INVALID_PATIENT_FORMAT, UNEXPECTED_ERROR,
};
pub use static_handlers::{serve_index, serve_static_file};
