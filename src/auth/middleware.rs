//! Gate middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{AccessGate, Decision};

/// Run the access gate in front of the rest of the router.
///
/// Logs every request path, then either answers with the 401 rejection
/// or hands the request to the next handler.
pub async fn require_tokens(
    State(gate): State<AccessGate>,
    request: Request<Body>,
    next: Next,
) -> Response {
    tracing::info!(path = %request.uri().path(), "Request received");

    let decision = gate.evaluate(request.uri(), request.headers()).await;

    match decision {
        Decision::Pass => next.run(request).await,
        Decision::Reject(e) => {
            tracing::debug!(path = %request.uri().path(), code = e.code(), "Request rejected");
            e.into_response()
        }
    }
}
