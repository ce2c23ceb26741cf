//! Error types for the access gate.
//!
//! Every rejection maps to a complete 401 response with a JSON `detail` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Terminal per-request rejection produced by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// `MASTER-TOKEN` missing or not equal to the configured master credential.
    #[error("Unauthorized Master Token")]
    MasterToken,

    /// `client_id` missing, unknown, or the directory lookup failed.
    #[error("Invalid Client ID")]
    UnknownClient,

    /// `ACCESS-TOKEN` missing or not equal to the client's token.
    #[error("Unauthorized Access Token")]
    AccessToken,
}

impl GateError {
    /// Short machine-readable name, used in log records.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::MasterToken => "MASTER_TOKEN",
            GateError::UnknownClient => "UNKNOWN_CLIENT",
            GateError::AccessToken => "ACCESS_TOKEN",
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Result type alias for gate checks.
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strings() {
        assert_eq!(GateError::MasterToken.to_string(), "Unauthorized Master Token");
        assert_eq!(GateError::UnknownClient.to_string(), "Invalid Client ID");
        assert_eq!(GateError::AccessToken.to_string(), "Unauthorized Access Token");
    }

    #[tokio::test]
    async fn test_rejection_response_shape() {
        let response = GateError::UnknownClient.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"detail": "Invalid Client ID"}));
    }
}
