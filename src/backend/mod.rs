//! Backend service clients.
//!
//! # Data Flow
//! ```text
//! Endpoint handler
//!     → builds a message generated from proto/*.proto (proto.rs)
//!     → attaches `user_id` call metadata
//!     → PostsBackend / StatisticBackend trait object
//!         → grpc.rs (tonic over a shared, lazily connected Channel)
//!         → or an in-process double in tests
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the traits only; the tonic clients are injected at startup
//! - Trait methods take and return `tonic::Request`/`Response` so call metadata
//!   travels with the call exactly as it does on the wire
//! - One channel per service, cloned per call (HTTP/2 multiplexes the streams)

pub mod grpc;
pub mod proto;

use std::sync::Arc;

use async_trait::async_trait;
use tonic::{Request, Response, Status};

use self::proto::{
    CountResponse, DynamicListResponse, ListCommentsResponse, ListPostsResponse,
    PaginatedListRequest, PostCommentRequest, PostDataRequest, PostDataResponse, PostId,
    TopTenParameter, TopTenPostsResponse, TopTenUsersResponse, UpdatePostRequest,
};

pub use grpc::{GrpcPostsClient, GrpcStatisticClient};

/// Metadata key carrying the caller's numeric id on outbound calls.
pub const USER_ID_METADATA: &str = "user_id";

/// Result of a unary backend call.
pub type RpcResult<T> = Result<Response<T>, Status>;

/// Content (posts) service.
#[async_trait]
pub trait PostsBackend: Send + Sync {
    async fn create_post(&self, request: Request<PostDataRequest>) -> RpcResult<()>;
    async fn delete_post(&self, request: Request<PostId>) -> RpcResult<()>;
    async fn update_post(&self, request: Request<UpdatePostRequest>) -> RpcResult<()>;
    async fn get_post(&self, request: Request<PostId>) -> RpcResult<PostDataResponse>;
    async fn get_post_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListPostsResponse>;
    async fn post_comment(&self, request: Request<PostCommentRequest>) -> RpcResult<()>;
    async fn post_like(&self, request: Request<PostId>) -> RpcResult<()>;
    async fn post_view(&self, request: Request<PostId>) -> RpcResult<()>;
    async fn get_comment_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListCommentsResponse>;
}

/// Analytics (statistic) service.
#[async_trait]
pub trait StatisticBackend: Send + Sync {
    async fn get_views_count(&self, request: Request<PostId>) -> RpcResult<CountResponse>;
    async fn get_likes_count(&self, request: Request<PostId>) -> RpcResult<CountResponse>;
    async fn get_comments_count(&self, request: Request<PostId>) -> RpcResult<CountResponse>;
    async fn get_views_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse>;
    async fn get_likes_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse>;
    async fn get_comments_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse>;
    async fn get_top_ten_posts(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenPostsResponse>;
    async fn get_top_ten_users(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenUsersResponse>;
}

/// Long-lived backend handles shared by every in-flight request.
#[derive(Clone)]
pub struct Backends {
    pub posts: Arc<dyn PostsBackend>,
    pub statistic: Arc<dyn StatisticBackend>,
}

impl Backends {
    pub fn new(posts: Arc<dyn PostsBackend>, statistic: Arc<dyn StatisticBackend>) -> Self {
        Self { posts, statistic }
    }
}
