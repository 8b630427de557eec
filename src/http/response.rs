//! Error taxonomy and its mapping onto HTTP responses.
//!
//! # Mapping
//! - malformed input, missing identity → 400
//! - bad or missing token → 401
//! - wrong method → 405
//! - body over `limits.max_body_bytes` → 413, whether or not it was chunked
//! - backend RPC failure → 500, body is the backend's own message
//! - identity service unreachable → 502, deadline exceeded → 504
//!
//! Every error body is a JSON string, the same shape as success messages.

use std::error::Error as StdError;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use thiserror::Error;

use crate::auth::AuthError;

/// Everything that can end a request early.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("caller identity is missing")]
    MissingIdentity,

    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    #[error("method {actual} is not allowed, expected {expected}")]
    MethodNotAllowed { expected: Method, actual: Method },

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream did not respond within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("{}", .0.message())]
    Backend(#[from] tonic::Status),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) | GatewayError::MissingIdentity => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Backend(_) | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_string())).into_response()
    }
}

/// Whether `err`, or anything it wraps, is the body-limit layer cutting off
/// a body that declared no `Content-Length`.
pub(crate) fn exceeds_body_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// A `200` whose body is a JSON-encoded message string.
pub fn message(text: &'static str) -> Response {
    (StatusCode::OK, Json(text)).into_response()
}
