//! HTTP API
//!
//! Axum-based HTTP surface exposing the retrieval modes.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
