//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backend selection and service construction
//! - `routes/`: HTTP handlers, one file per resource
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: `DomainError` to status code and JSON body

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
    };

    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
