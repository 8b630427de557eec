use async_trait::async_trait;
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use super::chain::{Interceptor, Next};
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

/// Rejects requests whose method differs from the endpoint's declared one.
#[derive(Debug, Clone)]
pub struct MethodGuard {
    allowed: Method,
}

impl MethodGuard {
    pub fn new(allowed: Method) -> Self {
        Self { allowed }
    }
}

#[async_trait]
impl Interceptor for MethodGuard {
    fn name(&self) -> &'static str {
        "method_guard"
    }

    async fn handle(&self, request: GatewayRequest, next: Next<'_>) -> Response {
        if *request.method() != self.allowed {
            tracing::warn!(
                request_id = %request.request_id(),
                path = %request.path(),
                method = %request.method(),
                expected = %self.allowed,
                "Method not allowed"
            );
            return GatewayError::MethodNotAllowed {
                expected: self.allowed.clone(),
                actual: request.method().clone(),
            }
            .into_response();
        }
        next.run(request).await
    }
}
