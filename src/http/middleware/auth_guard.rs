//! Authentication interceptor.
//! Verifies the bearer token and fills the request's identity slot.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};

use super::chain::{Interceptor, Next};
use crate::auth::{AuthError, TokenVerifier};
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

pub struct AuthGuard {
    verifier: Arc<TokenVerifier>,
}

impl AuthGuard {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl Interceptor for AuthGuard {
    fn name(&self) -> &'static str {
        "auth_guard"
    }

    async fn handle(&self, mut request: GatewayRequest, next: Next<'_>) -> Response {
        let verified = match request.headers().get(AUTHORIZATION) {
            None => self.verifier.verify(""),
            Some(value) => match value.to_str() {
                Ok(raw) => self.verifier.verify(raw),
                Err(_) => Err(AuthError::InvalidToken),
            },
        };

        let identity = match verified {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(
                    request_id = %request.request_id(),
                    path = %request.path(),
                    method = %request.method(),
                    error = %e,
                    "Request rejected by auth guard"
                );
                return GatewayError::Unauthorized(e).into_response();
            }
        };

        if let Err(e) = request.attach_identity(identity) {
            tracing::error!(request_id = %request.request_id(), error = %e, "Identity slot already filled");
            return e.into_response();
        }
        next.run(request).await
    }
}
