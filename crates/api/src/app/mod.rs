//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the capabilities handlers depend on (store, clock, timeout)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use userbook_observability::AccessLogSink;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Every route, including the 404 fallback, runs behind the request-id stage
/// and then the access-log stage.
pub fn build_app(services: AppServices, access_log: Arc<dyn AccessLogSink>) -> Router {
    let services = Arc::new(services);
    let access_state = middleware::AccessLogState::new(access_log);

    routes::router().layer(Extension(services)).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_id_middleware))
            .layer(axum::middleware::from_fn_with_state(
                access_state,
                middleware::access_log_middleware,
            )),
    )
}
