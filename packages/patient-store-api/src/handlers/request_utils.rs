//! Request utilities for HTTP endpoints.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::{Request, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::time;

use super::response::{INVALID_PATIENT_FORMAT, UNEXPECTED_ERROR};
use crate::router::RouterError;
use patient_store_core::config::ServerConfig;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

const INVALID_ID: &str = "Patient ID must be a positive integer";

/// Boxed error accepted from request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Helper function to read request body with timeout and size limit
pub async fn read_request_body_with_timeout<B>(
    req: Request<B>,
    config: &ServerConfig,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let timeout_duration = time::Duration::from_millis(config.request_timeout_ms);
    let limited = Limited::new(req.into_body(), config.max_body_bytes);
    let body = time::timeout(timeout_duration, limited.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                return RouterError::PayloadTooLarge(config.max_body_bytes);
            }
            tracing::warn!("Failed to read request body: {}", e);
            RouterError::UnprocessableEntity(INVALID_PATIENT_FORMAT.to_string())
        })?;
    Ok(body.to_bytes())
}

/// Parses a request body as JSON.
///
/// An empty (or whitespace only) body yields `None`, which validation reports
/// as a missing Patient. Malformed JSON is unprocessable.
pub fn parse_json_body(body: &[u8]) -> Result<Option<Value>, RouterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|e| {
        tracing::warn!("Failed to parse request body: {}", e);
        RouterError::UnprocessableEntity(INVALID_PATIENT_FORMAT.to_string())
    })
}

/// Extracts the `id` path parameter as a positive integer.
pub fn parse_patient_id(params: &MatchitParams<'_, '_>) -> Result<u64, RouterError> {
    params
        .get("id")
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| RouterError::BadRequest(INVALID_ID.to_string()))
}

/// Serializes a response payload.
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, RouterError> {
    serde_json::to_vec(value).map_err(|e| {
        tracing::error!("Failed to serialize response: {}", e);
        RouterError::InternalError(UNEXPECTED_ERROR.to_string())
    })
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from(json))
        .map_err(build_error)
}

/// Helper to build a 201 response pointing at the new resource
pub fn build_created_response(location: &str, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(201)
        .header(CONTENT_TYPE, "application/json")
        .header(LOCATION, location)
        .body(Bytes::from(json))
        .map_err(build_error)
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(build_error)
}

fn build_error(e: hyper::http::Error) -> RouterError {
    tracing::error!("Failed to build response: {}", e);
    RouterError::InternalError(UNEXPECTED_ERROR.to_string())
}
