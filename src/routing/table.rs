//! Static endpoint table.
//!
//! Built once at startup and frozen. Each path has exactly one descriptor
//! whose interceptor chain is fixed at build time:
//!
//! ```text
//! public      logger → method guard → handler
//! protected   logger → method guard → auth guard → handler
//! proxied     logger → method guard → reverse proxy
//! as caller   logger → method guard → auth guard → reverse proxy
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use thiserror::Error;

use crate::auth::TokenVerifier;
use crate::backend::Backends;
use crate::http::handlers::{self, posts, statistic};
use crate::http::middleware::{AuthGuard, Handler, Interceptor, Logger, MethodGuard, Next, ReverseProxy};
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("duplicate endpoint path: {0}")]
    DuplicatePath(&'static str),
}

/// One public path with its chain and optional terminal handler.
pub struct Endpoint {
    pub path: &'static str,
    pub method: Method,
    interceptors: Vec<Arc<dyn Interceptor>>,
    handler: Option<Arc<dyn Handler>>,
}

impl Endpoint {
    pub fn new(
        path: &'static str,
        method: Method,
        interceptors: Vec<Arc<dyn Interceptor>>,
        handler: Option<Arc<dyn Handler>>,
    ) -> Self {
        Self {
            path,
            method,
            interceptors,
            handler,
        }
    }

    /// Run a request through this endpoint's chain.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        Next::new(&self.interceptors, self.handler.as_deref())
            .run(GatewayRequest::new(request))
            .await
    }

    pub fn interceptor_names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }
}

/// Immutable path → endpoint table.
pub struct EndpointTable {
    endpoints: Vec<Arc<Endpoint>>,
}

impl EndpointTable {
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if !seen.insert(endpoint.path) {
                return Err(TableError::DuplicatePath(endpoint.path));
            }
        }
        Ok(Self {
            endpoints: endpoints.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.path == path).map(|e| e.as_ref())
    }

    /// Mount every endpoint on an axum router, any method per path.
    ///
    /// Method checks happen in the chain so a mismatch is a 405 from the
    /// method guard rather than axum's own response.
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for endpoint in self.endpoints {
            let path = endpoint.path;
            router = router.route(
                path,
                any(move |request: Request<Body>| {
                    let endpoint = endpoint.clone();
                    async move { endpoint.dispatch(request).await }
                }),
            );
        }
        router.fallback(not_found)
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json("page not found")).into_response()
}

/// Shared interceptors used to assemble chains.
struct ChainParts {
    logger: Arc<dyn Interceptor>,
    auth: Arc<dyn Interceptor>,
    proxy: Arc<dyn Interceptor>,
    backends: Backends,
}

impl ChainParts {
    fn chain(&self, method: &Method, tail: &[&Arc<dyn Interceptor>]) -> Vec<Arc<dyn Interceptor>> {
        let guard: Arc<dyn Interceptor> = Arc::new(MethodGuard::new(method.clone()));
        let mut chain = vec![self.logger.clone(), guard];
        chain.extend(tail.iter().map(|i| (*i).clone()));
        chain
    }

    fn public<F, Fut>(&self, path: &'static str, method: Method, f: F) -> Endpoint
    where
        F: Fn(Backends, GatewayRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
    {
        let chain = self.chain(&method, &[]);
        Endpoint::new(path, method, chain, Some(handlers::handler(&self.backends, f)))
    }

    fn protected<F, Fut>(&self, path: &'static str, method: Method, f: F) -> Endpoint
    where
        F: Fn(Backends, GatewayRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
    {
        let chain = self.chain(&method, &[&self.auth]);
        Endpoint::new(path, method, chain, Some(handlers::handler(&self.backends, f)))
    }

    fn proxied(&self, path: &'static str, method: Method) -> Endpoint {
        let chain = self.chain(&method, &[&self.proxy]);
        Endpoint::new(path, method, chain, None)
    }

    /// Proxied with the caller's identity forwarded as legacy headers.
    fn proxied_as_caller(&self, path: &'static str, method: Method) -> Endpoint {
        let chain = self.chain(&method, &[&self.auth, &self.proxy]);
        Endpoint::new(path, method, chain, None)
    }
}

/// The gateway's full public surface.
pub fn gateway_endpoints(verifier: Arc<TokenVerifier>, proxy: Arc<ReverseProxy>, backends: &Backends) -> Vec<Endpoint> {
    let parts = ChainParts {
        logger: Arc::new(Logger),
        auth: Arc::new(AuthGuard::new(verifier)),
        proxy: proxy as Arc<dyn Interceptor>,
        backends: backends.clone(),
    };

    vec![
        // users service
        parts.proxied("/register", Method::POST),
        parts.proxied("/login", Method::POST),
        parts.proxied_as_caller("/get_user_info", Method::GET),
        parts.proxied_as_caller("/update_user_info", Method::PUT),
        // posts service
        parts.protected("/create_post", Method::POST, posts::create_post),
        parts.protected("/get_post", Method::GET, posts::get_post),
        parts.protected("/get_post_list", Method::GET, posts::get_post_list),
        parts.protected("/delete_post", Method::DELETE, posts::delete_post),
        parts.protected("/update_post", Method::PUT, posts::update_post),
        parts.protected("/post_comment", Method::POST, posts::post_comment),
        parts.protected("/post_like", Method::POST, posts::post_like),
        parts.protected("/post_view", Method::POST, posts::post_view),
        parts.protected("/get_comment_list", Method::GET, posts::get_comment_list),
        // statistic service
        parts.public("/get_views_count", Method::GET, statistic::get_views_count),
        parts.public("/get_likes_count", Method::GET, statistic::get_likes_count),
        parts.public("/get_comments_count", Method::GET, statistic::get_comments_count),
        parts.public("/get_views_dynamic", Method::GET, statistic::get_views_dynamic),
        parts.public("/get_likes_dynamic", Method::GET, statistic::get_likes_dynamic),
        parts.public("/get_comments_dynamic", Method::GET, statistic::get_comments_dynamic),
        parts.public("/get_top_ten_posts", Method::GET, statistic::get_top_ten_posts),
        parts.public("/get_top_ten_users", Method::GET, statistic::get_top_ten_users),
    ]
}
