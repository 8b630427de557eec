//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the endpoint table and mount it on an axum router
//! - Serve the OpenAPI document and Swagger UI beside it
//! - Wire up tower layers (request ID, body limit, concurrency limit)
//! - Serve on a listener until shutdown, then drain in-flight requests

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenVerifier;
use crate::backend::Backends;
use crate::config::GatewayConfig;
use crate::http::middleware::ReverseProxy;
use crate::http::openapi::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_PATH};
use crate::lifecycle::startup::StartupError;
use crate::lifecycle::ShutdownSignal;
use crate::routing::{gateway_endpoints, EndpointTable};

/// HTTP front door of the gateway.
pub struct GatewayServer {
    router: Router,
    shutdown_timeout: Duration,
}

impl GatewayServer {
    pub fn new(config: &GatewayConfig, backends: Backends) -> Result<Self, StartupError> {
        let verifier = Arc::new(TokenVerifier::new(&config.auth));
        let proxy = ReverseProxy::new(&config.backends.users, &config.timeouts).map_err(|source| {
            StartupError::ProxyTarget {
                address: config.backends.users.clone(),
                source,
            }
        })?;

        let table = EndpointTable::new(gateway_endpoints(verifier, Arc::new(proxy), &backends))?;
        tracing::info!(endpoints = table.len(), "Endpoint table built");

        Ok(Self {
            router: Self::build_router(config, table),
            shutdown_timeout: Duration::from_secs(config.timeouts.shutdown_secs),
        })
    }

    /// Layers wrap outside-in in reverse order of the `.layer` calls:
    /// request ID is assigned first, then echoed, then the body limit and
    /// concurrency limit apply.
    fn build_router(config: &GatewayConfig, table: EndpointTable) -> Router {
        table
            .into_router()
            .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_in_flight))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, then drain for at most the configured
    /// shutdown timeout.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut drain_started = shutdown.clone();
        let drain_timeout = self.shutdown_timeout;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining in-flight requests");
            })
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = async {
                drain_started.recv().await;
                tokio::time::sleep(drain_timeout).await;
            } => {
                tracing::warn!(timeout = ?drain_timeout, "Drain timeout elapsed, abandoning remaining requests");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::backend::tests::unreachable_backends;
    use crate::http::X_REQUEST_ID;

    fn server() -> GatewayServer {
        GatewayServer::new(&GatewayConfig::default(), unreachable_backends()).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_with_request_id() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/get_views_count?post_id=1")
                    .header(X_REQUEST_ID, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
    }

    #[tokio::test]
    async fn test_swagger_ui_and_document_are_served() {
        let router = server().router();

        let ui = router
            .clone()
            .oneshot(Request::builder().uri("/swagger/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ui.status(), StatusCode::OK);

        let doc = router
            .oneshot(Request::builder().uri(OPENAPI_JSON_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(doc.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(doc.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/get_top_ten_users"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_backend_failure_is_500() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/get_views_count?post_id=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: String = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(message, "backend is down");
    }
}
