//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of clients in the credential directory.
    pub clients: usize,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Admin ====================

/// A configured client, without its token.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClientSummary {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response for listing configured clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListClientsResponse {
    pub clients: Vec<ClientSummary>,
    pub total: usize,
}

// ==================== Client ====================

/// Query parameters identifying the calling client.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientQuery {
    /// Client identifier checked by the gate.
    pub client_id: String,
}

/// The client the gate authenticated.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
