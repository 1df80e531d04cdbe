//! Front-end file serving.

use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Response};
use percent_encoding::percent_decode_str;

use crate::router::{AppState, RouterError};

use super::response::{ENDPOINT_NOT_FOUND, UNEXPECTED_ERROR};

/// Entry page served when no static directory is configured.
const BUNDLED_INDEX: &str = include_str!("../../static/index.html");

const INDEX_FILE: &str = "index.html";

fn endpoint_not_found() -> RouterError {
    RouterError::NotFound(ENDPOINT_NOT_FOUND.to_string())
}

/// Serves the front-end entry point for `GET /`.
pub async fn serve_index(state: &AppState) -> Result<Response<Bytes>, RouterError> {
    match &state.config.static_dir {
        Some(dir) => match read_file(&dir.join(INDEX_FILE)).await? {
            Some(contents) => file_response(INDEX_FILE, contents),
            None => Err(endpoint_not_found()),
        },
        None => file_response(INDEX_FILE, Bytes::from_static(BUNDLED_INDEX.as_bytes())),
    }
}

/// Serves a file from the static directory for paths no route claims.
///
/// Only `GET` and `HEAD` are served; everything else, and every path that
/// does not name a file inside the static directory, is a 404.
pub async fn serve_static_file(
    method: &Method,
    path: &str,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(endpoint_not_found());
    }
    let Some(dir) = &state.config.static_dir else {
        return Err(endpoint_not_found());
    };
    let Some(relative) = sanitize_path(path) else {
        return Err(endpoint_not_found());
    };

    match read_file(&dir.join(&relative)).await? {
        Some(contents) => file_response(&relative.to_string_lossy(), contents),
        None => Err(endpoint_not_found()),
    }
}

/// Turns a request path into a relative file path.
///
/// Returns `None` for paths with `..`, empty or hidden segments.
fn sanitize_path(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let mut relative = PathBuf::new();
    for segment in decoded.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment.starts_with('.') || segment.contains('\\') {
            return None;
        }
        relative.push(segment);
    }
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

/// Reads a regular file; `None` when it does not exist or is not a file.
async fn read_file(path: &Path) -> Result<Option<Bytes>, RouterError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Ok(None),
    }
    tokio::fs::read(path).await.map(|data| Some(Bytes::from(data))).map_err(|e| {
        tracing::error!("Failed to read {}: {}", path.display(), e);
        RouterError::InternalError(UNEXPECTED_ERROR.to_string())
    })
}

fn file_response(name: &str, contents: Bytes) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(200)
        .header(CONTENT_TYPE, content_type(name))
        .body(contents)
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            RouterError::InternalError(UNEXPECTED_ERROR.to_string())
        })
}

fn content_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
