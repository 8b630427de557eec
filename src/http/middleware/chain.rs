//! Interceptor chain primitives.
//!
//! An endpoint owns an ordered list of interceptors and, usually, a terminal
//! handler. Dispatch walks the list front to back; each interceptor either
//! answers the request itself or passes it on through [`Next`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};

use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

/// Cross-cutting behaviour wrapped around a handler.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Short name used when introspecting an endpoint's chain.
    fn name(&self) -> &'static str;

    /// Handle the request, optionally delegating to the rest of the chain.
    async fn handle(&self, request: GatewayRequest, next: Next<'_>) -> Response;
}

/// Terminal request handler at the end of a chain.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: GatewayRequest) -> Response;
}

/// The remainder of a chain, handed to each interceptor.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    handler: Option<&'a dyn Handler>,
}

impl<'a> Next<'a> {
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>], handler: Option<&'a dyn Handler>) -> Self {
        Self {
            interceptors,
            handler,
        }
    }

    /// Run the next interceptor, or the handler once the list is exhausted.
    pub async fn run(self, request: GatewayRequest) -> Response {
        if let Some((first, rest)) = self.interceptors.split_first() {
            let next = Next {
                interceptors: rest,
                handler: self.handler,
            };
            first.handle(request, next).await
        } else if let Some(handler) = self.handler {
            handler.call(request).await
        } else {
            tracing::error!(
                request_id = %request.request_id(),
                path = %request.path(),
                "Interceptor chain ended without a handler"
            );
            GatewayError::Internal("endpoint has no handler".into()).into_response()
        }
    }
}
