//! HTTP surface — axum router, request validation, JSON bodies.

pub mod routes;
pub mod schema;

pub use routes::{AppState, cors_layer, ticket_routes};

/// The full application router: ticket routes behind the CORS layer.
pub fn app(state: AppState, cors_origins: &[String]) -> axum::Router {
    ticket_routes(state).layer(cors_layer(cors_origins))
}
