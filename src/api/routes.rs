//! REST endpoints for ticket analysis and history.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use super::schema::{AnalyzeRequest, AnalyzeResponse, TicketListItem};
use crate::config::APP_VERSION;
use crate::error::ApiError;
use crate::service::TicketService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TicketService>,
    /// Longest accepted ticket message, in characters.
    pub max_message_chars: usize,
}

/// Build the ticket routes plus `/health`.
pub fn ticket_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tickets", get(list_tickets))
        .route("/tickets/analyze", post(analyze_ticket))
        .route("/tickets/{id}", get(get_ticket))
        .with_state(state)
}

/// CORS layer allowing the given origins, any method and any header.
///
/// A `*` entry allows every origin. Origins that are not valid header
/// values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": APP_VERSION
    }))
}

// ── Tickets ─────────────────────────────────────────────────────────────

/// POST /tickets/analyze
///
/// Runs the analyzer on the supplied message, stores the result, and
/// returns it with `201 Created`.
async fn analyze_ticket(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let message = body.validate(state.max_message_chars).inspect_err(|e| {
        info!(error = %e, "Rejected ticket");
    })?;

    let record = state.service.analyze_and_store(message).await.map_err(|e| {
        warn!(error = %e, "Ticket analysis failed");
        ApiError::Internal(format!("Failed to analyze ticket: {e}"))
    })?;

    Ok((StatusCode::CREATED, Json(AnalyzeResponse::from(record))))
}

/// GET /tickets
///
/// Every analyzed ticket, newest first.
async fn list_tickets(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tickets = state.service.list_tickets().await.map_err(|e| {
        warn!(error = %e, "Listing tickets failed");
        ApiError::Internal(format!("Failed to list tickets: {e}"))
    })?;

    let items: Vec<TicketListItem> = tickets.into_iter().map(TicketListItem::from).collect();
    Ok(Json(items))
}

/// GET /tickets/{id}
async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state.service.get_ticket(id).await.map_err(|e| {
        warn!(id = %id, error = %e, "Fetching ticket failed");
        ApiError::Internal(format!("Failed to fetch ticket: {e}"))
    })?;

    match ticket {
        Some(t) => Ok(Json(TicketListItem::from(t))),
        None => Err(ApiError::NotFound(format!("Ticket {id} not found"))),
    }
}
