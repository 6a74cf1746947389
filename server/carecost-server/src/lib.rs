//! CareCost Server - out-of-pocket cost estimate API
//!
//! Wraps the liability engine and the negotiated-rate catalog in a small
//! JSON API. All state is read-only after startup.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

pub use error::*;
pub use server::CareCostServer;

use std::time::Duration;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: CareCostServer) -> Router {
    let cors = middleware::create_cors_layer(&server.settings.server);
    let timeout = Duration::from_secs(server.settings.server.request_timeout_secs);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(timeout))
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
