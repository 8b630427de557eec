//! Endpoint handlers.
//!
//! # Data Flow
//! ```text
//! GatewayRequest (identity slot filled when behind the auth guard)
//!     → params.rs / models.rs (parse + validate input, 400 on failure)
//!     → generated protobuf message + `user_id` metadata
//!     → Backends (posts / statistic)
//!     → models.rs (public JSON view) → 200
//! ```
//!
//! Every handler is a plain `async fn(Backends, GatewayRequest)` returning
//! `Result<Response, GatewayError>`; [`handler`] adapts it to the chain's
//! [`Handler`] trait and renders errors.

pub mod models;
pub mod params;
pub mod posts;
pub mod statistic;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use tonic::metadata::MetadataValue;

use crate::auth::Identity;
use crate::backend::{Backends, USER_ID_METADATA};
use crate::http::middleware::Handler;
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

/// Adapter from an async function to [`Handler`].
pub struct FnHandler<F, Fut> {
    backends: Backends,
    f: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F, Fut>
where
    F: Fn(Backends, GatewayRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
{
    async fn call(&self, request: GatewayRequest) -> Response {
        let path = request.path().to_string();
        let method = request.method().clone();
        let request_id = request.request_id().to_string();

        match (self.f)(self.backends.clone(), request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    method = %method,
                    status = e.status_code().as_u16(),
                    error = %e,
                    "Request failed"
                );
                e.into_response()
            }
        }
    }
}

/// Wrap a handler function together with the backends it calls.
pub fn handler<F, Fut>(backends: &Backends, f: F) -> Arc<dyn Handler>
where
    F: Fn(Backends, GatewayRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
{
    Arc::new(FnHandler {
        backends: backends.clone(),
        f,
        _future: PhantomData,
    })
}

/// Outbound call carrying the caller's numeric id as `user_id` metadata.
pub(crate) fn outbound<T>(message: T, identity: &Identity) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request
        .metadata_mut()
        .insert(USER_ID_METADATA, MetadataValue::from(identity.numeric_id()));
    request
}
