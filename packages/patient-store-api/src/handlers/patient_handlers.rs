//! Patient CRUD and listing handlers.

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};
use patient_store_core::builder::{body_identifier, build_record};
use patient_store_core::error::{BuildError, StoreError, ValidationError};
use patient_store_core::validation::validate;

use super::request_utils::{
    build_created_response, build_empty_response, build_response, parse_json_body,
    parse_patient_id, read_request_body_with_timeout, to_json, BoxError, MatchitParams,
};
use super::response::{INVALID_PATIENT_FORMAT, UNEXPECTED_ERROR};

const ID_MISMATCH: &str = "Patient ID in body must match URL parameter";

fn not_found(id: u64) -> RouterError {
    RouterError::NotFound(format!("Patient with ID {} not found", id))
}

fn invalid(err: ValidationError) -> RouterError {
    RouterError::BadRequest(err.to_string())
}

fn unprocessable(err: BuildError) -> RouterError {
    tracing::warn!("Patient record could not be built: {}", err);
    RouterError::UnprocessableEntity(INVALID_PATIENT_FORMAT.to_string())
}

/// Maps store failures; `context` is the message used for internal errors.
fn map_store_error(err: StoreError, context: &str) -> RouterError {
    match err {
        StoreError::Build(build) => unprocessable(build),
        other => {
            tracing::error!("{}: {}", context, other);
            RouterError::InternalError(context.to_string())
        }
    }
}

/// Creates a new Patient.
///
/// # Endpoint
/// `POST /Patient`
///
/// # Request Body
/// ```json
/// {
///   "resourceType": "Patient",
///   "name": [{"given": ["Ana"], "family": "Souza"}],
///   "gender": "female"
/// }
/// ```
///
/// # Response
/// - **201 Created**: Returns the stored record, `Location: /Patient/{id}`
/// ```json
/// {
///   "resourceType": "Patient",
///   "identifier": [{"value": "1"}],
///   "name": [{"given": ["Ana"], "family": "Souza"}],
///   "gender": "female"
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Document fails validation
/// - **422 Unprocessable Entity**: Body is not JSON or its identifier entries are malformed
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:3000/Patient \
///   -H "Content-Type: application/json" \
///   -d '{"resourceType": "Patient", "gender": "female"}'
/// ```
pub async fn create_patient<B>(req: Request<B>, state: AppState) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let body_bytes = read_request_body_with_timeout(req, &state.config).await?;
    let candidate = parse_json_body(&body_bytes)?;
    let submitted = validate(candidate.as_ref()).map_err(invalid)?;

    let (id, record) = state
        .store
        .create(|id| build_record(id, submitted))
        .map_err(|e| map_store_error(e, UNEXPECTED_ERROR))?;
    tracing::info!(id, "patient created");

    let json = to_json(&record)?;
    build_created_response(&format!("/Patient/{}", id), json)
}

/// Reads a Patient.
///
/// # Endpoint
/// `GET /Patient/{id}`
///
/// # Response
/// - **200 OK**: Returns the stored record
///
/// # Errors
/// - **400 Bad Request**: Id is not a positive integer
/// - **404 Not Found**: No Patient with that id
pub fn read_patient(
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_patient_id(&params)?;

    let record = state
        .store
        .get(id)
        .map_err(|e| map_store_error(e, "Error retrieving patient"))?
        .ok_or_else(|| not_found(id))?;

    build_response(200, to_json(&record)?)
}

/// Replaces a Patient.
///
/// # Endpoint
/// `PUT /Patient/{id}`
///
/// # Request Body
/// A full Patient document. If `identifier[0].value` holds a number it must
/// equal `{id}`.
///
/// # Response
/// - **200 OK**: Returns the replaced record
///
/// # Errors
/// - **400 Bad Request**: Invalid id, document fails validation, or body id differs from path id
/// - **422 Unprocessable Entity**: Body is not JSON or its identifier entries are malformed
///
/// # Notes
/// - The whole record is replaced; fields not submitted are dropped
/// - An id that does not exist yet is inserted
///
/// # Example
/// ```bash
/// curl -X PUT http://localhost:3000/Patient/1 \
///   -H "Content-Type: application/json" \
///   -d '{"resourceType": "Patient", "identifier": [{"value": "1"}], "gender": "other"}'
/// ```
pub async fn update_patient<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let id = parse_patient_id(&params)?;

    let body_bytes = read_request_body_with_timeout(req, &state.config).await?;
    let candidate = parse_json_body(&body_bytes)?;
    let submitted = validate(candidate.as_ref()).map_err(invalid)?;

    if let Some(body_id) = body_identifier(submitted).map_err(unprocessable)? {
        if i64::try_from(id).ok() != Some(body_id) {
            return Err(RouterError::BadRequest(ID_MISMATCH.to_string()));
        }
    }

    let record = build_record(id, submitted).map_err(unprocessable)?;
    let record = state
        .store
        .put(id, record)
        .map_err(|e| map_store_error(e, UNEXPECTED_ERROR))?;
    tracing::info!(id, "patient updated");

    build_response(200, to_json(&record)?)
}

/// Deletes a Patient.
///
/// # Endpoint
/// `DELETE /Patient/{id}`
///
/// # Response
/// - **204 No Content**: Patient removed
///
/// # Errors
/// - **400 Bad Request**: Id is not a positive integer
/// - **404 Not Found**: No Patient with that id
pub fn delete_patient(
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_patient_id(&params)?;

    let existed = state
        .store
        .delete(id)
        .map_err(|e| map_store_error(e, "Error deleting patient"))?;
    if !existed {
        return Err(not_found(id));
    }
    tracing::info!(id, "patient deleted");

    build_empty_response(204)
}

/// Lists stored Patient ids.
///
/// # Endpoint
/// `GET /PatientIDs`
///
/// # Response
/// - **200 OK**: Ascending array of ids, e.g. `[1, 2, 3]`
/// - **204 No Content**: Store is empty (never an empty array)
pub fn list_patient_ids(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let ids = state
        .store
        .list_ids()
        .map_err(|e| map_store_error(e, "Error retrieving patient IDs"))?;

    if ids.is_empty() {
        return build_empty_response(204);
    }
    build_response(200, to_json(&ids)?)
}
