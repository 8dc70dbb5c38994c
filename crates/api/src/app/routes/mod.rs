use axum::{Router, routing::get};

pub mod system;
pub mod users;

/// Router for every endpoint served by the API.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/users", users::router())
}
