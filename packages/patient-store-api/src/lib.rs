//! REST API server for the Patient store.
//!
//! Provides HTTP endpoints for Patient CRUD and listing, static front-end
//! serving, CORS handling, and request routing.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
