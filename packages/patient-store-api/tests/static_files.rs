//! Front-end serving tests.

mod common;

use std::fs;

use tempfile::tempdir;

use common::{get, router, router_with, send};
use patient_store_core::config::ServerConfig;

#[tokio::test]
async fn bundled_index_without_static_dir() {
    let router = router();
    let response = get(&router, "/").await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.header("content-type"),
        Some("text/html; charset=utf-8")
    );
    assert!(response.text().contains("<title>PatientsOnFIRE</title>"));

    // No directory means no other files
    assert_eq!(get(&router, "/app.js").await.status, 404);
}

#[tokio::test]
async fn head_returns_headers_only() {
    let router = router();
    let response = send(&router, "HEAD", "/", "").await;
    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
    assert_eq!(
        response.header("content-type"),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn files_served_from_static_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>custom</h1>").unwrap();
    fs::create_dir_all(dir.path().join("js/utils")).unwrap();
    fs::write(dir.path().join("js/utils/formatter.js"), "export {};").unwrap();

    let router = router_with(ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });

    let index = get(&router, "/").await;
    assert_eq!(index.text(), "<h1>custom</h1>");

    let script = get(&router, "/js/utils/formatter.js").await;
    assert_eq!(script.status, 200);
    assert_eq!(
        script.header("content-type"),
        Some("text/javascript; charset=utf-8")
    );
    assert_eq!(script.text(), "export {};");

    // Directories and missing files are not served
    assert_eq!(get(&router, "/js").await.status, 404);
    assert_eq!(get(&router, "/missing.css").await.status, 404);

    // Only GET and HEAD reach static files
    assert_eq!(send(&router, "POST", "/js/utils/formatter.js", "").await.status, 404);
}

#[tokio::test]
async fn traversal_outside_static_dir_is_refused() {
    let root = tempdir().unwrap();
    let public = root.path().join("public");
    fs::create_dir_all(&public).unwrap();
    fs::write(root.path().join("secret.txt"), "secret").unwrap();

    let router = router_with(ServerConfig {
        static_dir: Some(public),
        ..Default::default()
    });

    for uri in ["/../secret.txt", "/%2e%2e/secret.txt"] {
        let response = get(&router, uri).await;
        assert_eq!(response.status, 404, "{}", uri);
        assert!(!response.text().contains("secret\""));
    }
}

#[tokio::test]
async fn static_dir_without_index_is_not_found() {
    let dir = tempdir().unwrap();
    let router = router_with(ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });
    assert_eq!(get(&router, "/").await.status, 404);
}
