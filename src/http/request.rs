//! Inbound request wrapper.
//!
//! # Responsibilities
//! - Carry the HTTP request through the interceptor chain
//! - Hold the write-once caller identity slot filled by the auth guard
//! - Decode JSON bodies and query strings into typed values
//!
//! # Design Decisions
//! - Request ID is assigned by a tower-http layer before any interceptor runs
//! - Identity lives beside the request, not in a global or a header, so a
//!   client can never inject one

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::Query;
use axum::http::{HeaderMap, Method, Request};
use serde::de::DeserializeOwned;

use crate::auth::Identity;
use crate::http::response::{exceeds_body_limit, GatewayError};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An inbound request plus its request-scoped identity slot.
#[derive(Debug)]
pub struct GatewayRequest {
    inner: Request<Body>,
    identity: Option<Identity>,
}

impl GatewayRequest {
    pub fn new(inner: Request<Body>) -> Self {
        Self {
            inner,
            identity: None,
        }
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Correlation ID set by the request-id layer, or `"unknown"`.
    pub fn request_id(&self) -> &str {
        self.inner
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Fill the identity slot. Fails if an identity was already attached.
    pub fn attach_identity(&mut self, identity: Identity) -> Result<(), GatewayError> {
        if self.identity.is_some() {
            return Err(GatewayError::Internal("caller identity attached twice".into()));
        }
        self.identity = Some(identity);
        Ok(())
    }

    /// Identity for handlers behind the auth guard.
    ///
    /// A missing identity is reported as a client error instead of trusting
    /// that the chain was assembled correctly.
    pub fn require_identity(&self) -> Result<&Identity, GatewayError> {
        self.identity.as_ref().ok_or(GatewayError::MissingIdentity)
    }

    /// Decode the query string into a flat map.
    pub fn query_params(&self) -> Result<HashMap<String, String>, GatewayError> {
        Query::<HashMap<String, String>>::try_from_uri(self.inner.uri())
            .map(|Query(params)| params)
            .map_err(|e| GatewayError::BadRequest(format!("invalid query string: {e}")))
    }

    /// Read the whole body and decode it as JSON.
    ///
    /// The body is consumed; calling this twice yields an empty body error.
    /// Size is bounded by the body-limit layer in front of the router, which
    /// cuts off chunked bodies mid-stream.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T, GatewayError> {
        let body = std::mem::take(self.inner.body_mut());
        let bytes = axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
            if exceeds_body_limit(&e) {
                GatewayError::PayloadTooLarge
            } else {
                GatewayError::BadRequest(format!("failed to read request body: {e}"))
            }
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::BadRequest(format!("invalid request body: {e}")))
    }

    /// Split into the raw request and the identity slot.
    pub fn into_parts(self) -> (Request<Body>, Option<Identity>) {
        (self.inner, self.identity)
    }
}
