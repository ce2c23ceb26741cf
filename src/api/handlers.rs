//! HTTP request handlers.
//!
//! Handlers run only after the gate has let the request through.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::types::*;
use crate::error::{GateError, GateResult};
use crate::AppState;

/// Service health.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        clients: state.directory.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// List configured clients.
///
/// GET /admin/clients
#[utoipa::path(
    get,
    path = "/admin/clients",
    responses(
        (status = 200, description = "Configured clients", body = ListClientsResponse),
        (status = 401, description = "Unauthorized Master Token")
    ),
    security(("master_token" = [])),
    tag = "admin"
)]
pub async fn list_clients(State(state): State<AppState>) -> Json<ListClientsResponse> {
    let clients: Vec<ClientSummary> = state
        .directory
        .client_ids()
        .into_iter()
        .map(|client_id| {
            let name = state
                .directory
                .get(&client_id)
                .and_then(|credential| credential.name.clone());
            ClientSummary { client_id, name }
        })
        .collect();

    Json(ListClientsResponse {
        total: clients.len(),
        clients,
    })
}

/// Identify the calling client.
///
/// GET /api/whoami?client_id=...
#[utoipa::path(
    get,
    path = "/api/whoami",
    params(ClientQuery),
    responses(
        (status = 200, description = "Authenticated client", body = WhoAmIResponse),
        (status = 401, description = "Invalid Client ID or Unauthorized Access Token")
    ),
    security(("access_token" = [])),
    tag = "client"
)]
pub async fn whoami(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> GateResult<Json<WhoAmIResponse>> {
    let credential = state
        .directory
        .get(&query.client_id)
        .ok_or(GateError::UnknownClient)?;

    tracing::debug!(client_id = %query.client_id, "Resolved calling client");

    Ok(Json(WhoAmIResponse {
        name: credential.name.clone(),
        client_id: query.client_id,
    }))
}
