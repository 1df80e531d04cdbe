//! Helpers for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::Request;
use serde_json::Value;

use patient_store_api::router::Router;
use patient_store_core::config::ServerConfig;
use patient_store_core::PatientStore;

/// Response parts captured for assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub fn router() -> Router {
    router_with(ServerConfig::default())
}

pub fn router_with(config: ServerConfig) -> Router {
    Router::new(Arc::new(PatientStore::new()), Arc::new(config))
}

pub async fn send(router: &Router, method: &str, uri: &str, body: &str) -> TestResponse {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();
    let response = router.route(req).await;
    TestResponse {
        status: response.status().as_u16(),
        headers: response.headers().clone(),
        body: response.into_body(),
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, "GET", uri, "").await
}

pub async fn post(router: &Router, uri: &str, body: &str) -> TestResponse {
    send(router, "POST", uri, body).await
}

pub async fn put(router: &Router, uri: &str, body: &str) -> TestResponse {
    send(router, "PUT", uri, body).await
}

pub async fn delete(router: &Router, uri: &str) -> TestResponse {
    send(router, "DELETE", uri, "").await
}
