//! Reverse proxy to the legacy users service.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the fixed upstream authority
//! - Strip hop-by-hop headers in both directions
//! - Forward the caller's identity as `Login`/`Password`/`UserID` headers when
//!   an earlier interceptor attached one
//! - Stream the upstream response back untouched
//!
//! # Failure mapping
//! - connection failure → 502
//! - no response within the backend deadline → 504
//! - chunked request body cut off by the body limit → 413

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::uri::{Authority, InvalidUri, Scheme};
use axum::http::{HeaderMap, Request, Uri, Version};
use axum::response::{IntoResponse, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::chain::{Interceptor, Next};
use crate::auth::Identity;
use crate::config::TimeoutConfig;
use crate::http::request::GatewayRequest;
use crate::http::response::{exceeds_body_limit, GatewayError};

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Headers the users service reads the caller from.
const LEGACY_IDENTITY_HEADERS: [&str; 3] = ["login", "password", "userid"];

/// Terminal interceptor forwarding requests to one upstream.
pub struct ReverseProxy {
    target: Authority,
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl ReverseProxy {
    pub fn new(target: &str, timeouts: &TimeoutConfig) -> Result<Self, InvalidUri> {
        let target = Authority::from_str(target)?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            target,
            client,
            timeout: Duration::from_secs(timeouts.backend_secs),
        })
    }

    async fn forward(&self, request: GatewayRequest) -> Result<Response, GatewayError> {
        let request_id = request.request_id().to_string();
        let (inbound, identity) = request.into_parts();
        let (mut parts, body) = inbound.into_parts();

        parts.uri = rewrite_uri(&parts.uri, &self.target)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        for name in LEGACY_IDENTITY_HEADERS {
            parts.headers.remove(name);
        }
        if let Some(identity) = identity.as_ref() {
            insert_identity_headers(&mut parts.headers, identity)?;
        }
        let host = HeaderValue::from_str(self.target.as_str())
            .map_err(|e| GatewayError::Internal(format!("invalid upstream host: {e}")))?;
        parts.headers.insert(HOST, host);

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            uri = %parts.uri,
            "Proxying request"
        );

        let outbound = Request::from_parts(parts, body);
        let response = match tokio::time::timeout(self.timeout, self.client.request(outbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if exceeds_body_limit(&e) => return Err(GatewayError::PayloadTooLarge),
            Ok(Err(e)) => {
                tracing::error!(request_id = %request_id, upstream = %self.target, error = %e, "Upstream error");
                return Err(GatewayError::UpstreamUnavailable(e.to_string()));
            }
            Err(_) => {
                tracing::error!(request_id = %request_id, upstream = %self.target, timeout = ?self.timeout, "Upstream timed out");
                return Err(GatewayError::UpstreamTimeout(self.timeout));
            }
        };

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[async_trait]
impl Interceptor for ReverseProxy {
    fn name(&self) -> &'static str {
        "reverse_proxy"
    }

    async fn handle(&self, request: GatewayRequest, _next: Next<'_>) -> Response {
        match self.forward(request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}

fn rewrite_uri(uri: &Uri, target: &Authority) -> Result<Uri, GatewayError> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(target.clone())
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| GatewayError::Internal(format!("failed to rewrite uri: {e}")))
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

fn insert_identity_headers(headers: &mut HeaderMap, identity: &Identity) -> Result<(), GatewayError> {
    let values = [
        ("login", identity.login().to_string()),
        ("password", identity.legacy_password().to_string()),
        ("userid", identity.numeric_id().to_string()),
    ];
    for (name, value) in values {
        let value = HeaderValue::from_str(&value)
            .map_err(|_| GatewayError::BadRequest(format!("identity field {name} is not header-safe")))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(())
}
