//! Request logging interceptor.

use std::time::Instant;

use async_trait::async_trait;
use axum::response::Response;

use super::chain::{Interceptor, Next};
use crate::http::request::GatewayRequest;
use crate::observability::metrics;

/// Logs the start and end of every request and records request metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

#[async_trait]
impl Interceptor for Logger {
    fn name(&self) -> &'static str {
        "logger"
    }

    async fn handle(&self, request: GatewayRequest, next: Next<'_>) -> Response {
        let mut scope = RequestScope::begin(&request);
        let response = next.run(request).await;
        scope.status = Some(response.status().as_u16());
        response
    }
}

/// Emits the "request finished" line when dropped.
///
/// Dropping happens on every exit path, including when the client goes away
/// and the request future is cancelled mid-flight; `status` stays `None` then.
struct RequestScope {
    path: String,
    method: String,
    request_id: String,
    start: Instant,
    status: Option<u16>,
}

impl RequestScope {
    fn begin(request: &GatewayRequest) -> Self {
        let scope = Self {
            path: request.path().to_string(),
            method: request.method().to_string(),
            request_id: request.request_id().to_string(),
            start: Instant::now(),
            status: None,
        };
        tracing::info!(
            request_id = %scope.request_id,
            method = %scope.method,
            path = %scope.path,
            "Request started"
        );
        scope
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        let status = match self.status {
            Some(code) => code.to_string(),
            None => "aborted".to_string(),
        };
        tracing::info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            status = %status,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            "Request finished"
        );
        metrics::record_request(&self.path, &self.method, &status, self.start);
    }
}
