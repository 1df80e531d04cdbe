//! Matchit routing configuration.

use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers::request_utils::BoxError;
use crate::handlers::{self, error_response, ENDPOINT_NOT_FOUND, UNEXPECTED_ERROR};
use crate::middleware;
use patient_store_core::{config::ServerConfig, PatientStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Patient store
    pub store: Arc<PatientStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(store: Arc<PatientStore>, config: Arc<ServerConfig>) -> Self {
        let mut router = MatchitRouter::new();

        // Front-end entry point
        router
            .insert("/", RouteHandler::Index)
            .expect("Failed to insert / route");

        // Patient CRUD endpoints
        router
            .insert("/Patient", RouteHandler::Patient)
            .expect("Failed to insert /Patient route");
        router
            .insert("/Patient/{id}", RouteHandler::PatientById)
            .expect("Failed to insert /Patient/{id} route");

        // Listing endpoint
        router
            .insert("/PatientIDs", RouteHandler::PatientIds)
            .expect("Failed to insert /PatientIDs route");

        Self {
            inner: router,
            state: AppState { store, config },
        }
    }

    /// Shared state handed to every handler.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// Handler errors are rendered as JSON error bodies here, so the returned
    /// response is always complete. CORS headers are added to every response.
    pub async fn route<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let path = req.uri().path().to_string();
        let method = req.method().clone();
        tracing::debug!(%method, %path, "request");

        let result = if method == Method::OPTIONS {
            middleware::preflight_response(&req)
        } else {
            match self.inner.at(&path) {
                Ok(matched) => {
                    matched
                        .value
                        .handle(req, matched.params, self.state.clone())
                        .await
                }
                Err(_) => handlers::serve_static_file(&method, &path, &self.state).await,
            }
        };

        let mut response = match result {
            Ok(response) => response,
            Err(err) => {
                if let RouterError::InternalError(_) = err {
                    tracing::error!(%method, %path, "{}", err);
                } else {
                    tracing::warn!(%method, %path, "{}", err);
                }
                err.into()
            }
        };

        if method == Method::HEAD {
            *response.body_mut() = Bytes::new();
        }
        middleware::apply_cors(&mut response);
        response
    }
}

/// Route handler function.
enum RouteHandler {
    Index,
    Patient,
    PatientById,
    PatientIds,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        match (self, req.method()) {
            (RouteHandler::Index, &Method::GET | &Method::HEAD) => {
                handlers::serve_index(&state).await
            }
            (RouteHandler::Patient, &Method::POST) => handlers::create_patient(req, state).await,
            (RouteHandler::PatientById, &Method::GET) => handlers::read_patient(params, state),
            (RouteHandler::PatientById, &Method::PUT) => {
                handlers::update_patient(req, params, state).await
            }
            (RouteHandler::PatientById, &Method::DELETE) => handlers::delete_patient(params, state),
            (RouteHandler::PatientIds, &Method::GET) => handlers::list_patient_ids(state),
            _ => Err(RouterError::NotFound(ENDPOINT_NOT_FOUND.to_string())),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    BadRequest(String),
    NotFound(String),
    UnprocessableEntity(String),
    InternalError(String),
    Timeout,
    PayloadTooLarge(usize),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::Timeout => 408,
            RouterError::PayloadTooLarge(_) => 413,
            RouterError::UnprocessableEntity(_) => 422,
            RouterError::InternalError(_) => 500,
        }
    }

    fn message(&self) -> String {
        match self {
            RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::UnprocessableEntity(msg)
            | RouterError::InternalError(msg) => msg.clone(),
            RouterError::Timeout => "Request body was not received in time".to_string(),
            RouterError::PayloadTooLarge(limit) => {
                format!("Request body must not exceed {} bytes", limit)
            }
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::UnprocessableEntity(msg) => write!(f, "Unprocessable Entity: {}", msg),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::PayloadTooLarge(limit) => {
                write!(f, "Payload Too Large: body exceeds {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let error_response = error_response(status, err.message());
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|_| {
            format!(
                "{{\"error\":\"Internal Server Error\",\"message\":\"{}\"}}",
                UNEXPECTED_ERROR
            )
            .into_bytes()
        });

        Response::builder()
            .status(status)
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from_static(b"Internal Server Error"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
