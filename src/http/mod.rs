//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the playlist endpoints
//! - Caller authentication and error mapping
//! - HTTP headers (Content-Type, Content-Disposition)
//! - CORS middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
