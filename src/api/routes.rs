//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_tokens, AccessGate, ACCESS_TOKEN_HEADER, MASTER_TOKEN_HEADER};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "master_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(MASTER_TOKEN_HEADER))),
            );
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACCESS_TOKEN_HEADER))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::list_clients,
        handlers::whoami,
    ),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::api::types::ClientSummary,
        crate::api::types::ListClientsResponse,
        crate::api::types::WhoAmIResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "admin", description = "Master-token protected endpoints"),
        (name = "client", description = "Access-token protected endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Access Gate API",
        version = "0.1.0",
        description = "Master and per-client token checks in front of an HTTP service",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router with the access gate in front of every route.
///
/// Which routes need which token is decided by the gate's configured
/// path prefixes, not by the route table.
pub fn build_router(state: AppState, gate: AccessGate) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/admin/clients", get(handlers::list_clients))
        .route("/api/whoami", get(handlers::whoami))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(middleware::from_fn_with_state(gate, require_tokens))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::auth::StaticDirectory;
    use crate::config::Config;

    const TEST_CONFIG: &str = r#"
auth:
  master_token: secret123
  master_paths: ["/admin"]
  access_token_paths: ["/api"]
  clients:
    - client_id: abc
      access_token: tok-abc
      name: ABC Corp
"#;

    fn build_test_app() -> Router {
        let config = Config::from_yaml(TEST_CONFIG).unwrap();
        let directory = StaticDirectory::new(config.auth.clients.clone());
        let gate = AccessGate::new(&config.auth, Arc::new(directory.clone()));
        build_router(AppState { directory }, gate)
    }

    async fn send(uri: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        build_test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn assert_rejected(resp: Response, detail: &str) {
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await, serde_json::json!({ "detail": detail }));
    }

    #[tokio::test]
    async fn test_public_path_passes() {
        let resp = send("/health", &[]).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["clients"], 1);
    }

    #[tokio::test]
    async fn test_unmatched_path_reaches_router() {
        // Gate passes; the router answers 404, not 401
        let resp = send("/public/info", &[]).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_is_public() {
        let resp = send("/docs/openapi.json", &[]).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert!(body["components"]["securitySchemes"]["master_token"].is_object());
    }

    #[tokio::test]
    async fn test_admin_with_master_token() {
        let resp = send("/admin/clients", &[("MASTER-TOKEN", "secret123")]).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["clients"][0]["client_id"], "abc");
        assert_eq!(body["clients"][0]["name"], "ABC Corp");
        // Tokens never leave the directory
        assert!(body["clients"][0].get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_admin_rejections() {
        let resp = send("/admin/clients", &[("MASTER-TOKEN", "wrong")]).await;
        assert_rejected(resp, "Unauthorized Master Token").await;

        let resp = send("/admin/clients", &[]).await;
        assert_rejected(resp, "Unauthorized Master Token").await;

        // Prefix match covers paths with no route
        let resp = send("/admin/nothing-here", &[]).await;
        assert_rejected(resp, "Unauthorized Master Token").await;
    }

    #[tokio::test]
    async fn test_api_with_access_token() {
        let resp = send("/api/whoami?client_id=abc", &[("ACCESS-TOKEN", "tok-abc")]).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["client_id"], "abc");
        assert_eq!(body["name"], "ABC Corp");
    }

    #[tokio::test]
    async fn test_api_rejections() {
        let resp = send("/api/whoami?client_id=zzz", &[("ACCESS-TOKEN", "tok-abc")]).await;
        assert_rejected(resp, "Invalid Client ID").await;

        let resp = send("/api/whoami", &[("ACCESS-TOKEN", "tok-abc")]).await;
        assert_rejected(resp, "Invalid Client ID").await;

        let resp = send("/api/whoami?client_id=abc", &[("ACCESS-TOKEN", "bad")]).await;
        assert_rejected(resp, "Unauthorized Access Token").await;

        let resp = send("/api/whoami?client_id=abc", &[]).await;
        assert_rejected(resp, "Unauthorized Access Token").await;
    }

    #[tokio::test]
    async fn test_token_values_case_sensitive() {
        let resp = send("/admin/clients", &[("MASTER-TOKEN", "SECRET123")]).await;
        assert_rejected(resp, "Unauthorized Master Token").await;

        let resp = send("/api/whoami?client_id=abc", &[("ACCESS-TOKEN", "TOK-ABC")]).await;
        assert_rejected(resp, "Unauthorized Access Token").await;
    }
}
