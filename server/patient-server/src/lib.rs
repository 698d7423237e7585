//! Patient registry server
//!
//! Web pages and a JSON API for creating, viewing, updating and listing
//! patient demographic records, plus two lookups used by the assessment
//! and history services.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;
pub mod views;

// Re-export commonly used types
pub use error::*;
pub use server::PatientServer;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: PatientServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
