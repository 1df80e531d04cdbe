//! Cross-origin resource sharing.
//!
//! Every response allows any origin. Preflight (`OPTIONS`) requests are
//! answered directly with the allowed methods and the requested headers.

use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_LENGTH, VARY,
};
use hyper::{Request, Response};

use crate::handlers::request_utils::build_empty_response;
use crate::router::RouterError;

/// Methods advertised to browsers in preflight responses.
pub const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Adds the allow-any-origin header.
pub fn apply_cors(response: &mut Response<Bytes>) {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

/// Answers a CORS preflight request with 204.
pub fn preflight_response<B>(req: &Request<B>) -> Result<Response<Bytes>, RouterError> {
    let mut response = build_empty_response(204)?;
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_echoes_requested_headers() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/Patient")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(())
            .unwrap();
        let response = preflight_response(&req).unwrap();
        assert_eq!(response.status(), 204);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_METHODS],
            ALLOWED_METHODS
        );
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
    }

    #[test]
    fn cors_header_is_added() {
        let mut response = Response::new(Bytes::new());
        apply_cors(&mut response);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
