//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the front-end files (bundled page when unset)
    pub static_dir: Option<PathBuf>,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Resolves the configured host and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: None,
            request_timeout_ms: 5000, // 5 seconds default
            max_body_bytes: 100 * 1024,
        }
    }
}
