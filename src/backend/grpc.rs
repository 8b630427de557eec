//! tonic clients for the posts and statistic services.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;

use super::proto::posts::posts_service_client::PostsServiceClient;
use super::proto::statistic::statistic_service_client::StatisticServiceClient;
use super::proto::{
    CountResponse, DynamicListResponse, ListCommentsResponse, ListPostsResponse,
    PaginatedListRequest, PostCommentRequest, PostDataRequest, PostDataResponse, PostId,
    TopTenParameter, TopTenPostsResponse, TopTenUsersResponse, UpdatePostRequest,
};
use super::{PostsBackend, RpcResult, StatisticBackend};
use crate::config::TimeoutConfig;
use crate::observability::metrics;

const POSTS_SERVICE: &str = "posts.PostsService";
const STATISTIC_SERVICE: &str = "statistic.StatisticService";

/// Build a lazily connected channel to a gRPC backend.
///
/// No connection is attempted until the first call, so the gateway starts
/// even while a backend is down; calls made meanwhile fail with `Unavailable`.
pub fn connect_lazy(address: &str, timeouts: &TimeoutConfig) -> Result<Channel, tonic::transport::Error> {
    let channel = Endpoint::from_shared(address.to_string())?
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.backend_secs))
        .connect_lazy();

    tracing::info!(address = %address, "Backend channel configured");
    Ok(channel)
}

/// Await one unary call, logging a failure and recording its outcome.
async fn observe<T>(
    service: &'static str,
    method: &'static str,
    call: impl Future<Output = RpcResult<T>>,
) -> RpcResult<T> {
    let result = call.await;
    if let Err(status) = &result {
        tracing::debug!(service, method, code = ?status.code(), message = %status.message(), "Backend call failed");
    }
    metrics::record_backend_call(service, method, result.is_ok());
    result
}

/// Client for `posts.PostsService`.
///
/// Each call works on a clone; clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct GrpcPostsClient {
    inner: PostsServiceClient<Channel>,
}

impl GrpcPostsClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: PostsServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl PostsBackend for GrpcPostsClient {
    async fn create_post(&self, request: Request<PostDataRequest>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "CreatePost", client.create_post(request)).await
    }

    async fn delete_post(&self, request: Request<PostId>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "DeletePost", client.delete_post(request)).await
    }

    async fn update_post(&self, request: Request<UpdatePostRequest>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "UpdatePost", client.update_post(request)).await
    }

    async fn get_post(&self, request: Request<PostId>) -> RpcResult<PostDataResponse> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "GetPost", client.get_post(request)).await
    }

    async fn get_post_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListPostsResponse> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "GetPostList", client.get_post_list(request)).await
    }

    async fn post_comment(&self, request: Request<PostCommentRequest>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "PostComment", client.post_comment(request)).await
    }

    async fn post_like(&self, request: Request<PostId>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "PostLike", client.post_like(request)).await
    }

    async fn post_view(&self, request: Request<PostId>) -> RpcResult<()> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "PostView", client.post_view(request)).await
    }

    async fn get_comment_list(&self, request: Request<PaginatedListRequest>) -> RpcResult<ListCommentsResponse> {
        let mut client = self.inner.clone();
        observe(POSTS_SERVICE, "GetCommentList", client.get_comment_list(request)).await
    }
}

/// Client for `statistic.StatisticService`.
#[derive(Debug, Clone)]
pub struct GrpcStatisticClient {
    inner: StatisticServiceClient<Channel>,
}

impl GrpcStatisticClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: StatisticServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl StatisticBackend for GrpcStatisticClient {
    async fn get_views_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetViewsCount", client.get_views_count(request)).await
    }

    async fn get_likes_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetLikesCount", client.get_likes_count(request)).await
    }

    async fn get_comments_count(&self, request: Request<PostId>) -> RpcResult<CountResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetCommentsCount", client.get_comments_count(request)).await
    }

    async fn get_views_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetViewsDynamic", client.get_views_dynamic(request)).await
    }

    async fn get_likes_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetLikesDynamic", client.get_likes_dynamic(request)).await
    }

    async fn get_comments_dynamic(&self, request: Request<PostId>) -> RpcResult<DynamicListResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetCommentsDynamic", client.get_comments_dynamic(request)).await
    }

    async fn get_top_ten_posts(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenPostsResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetTopTenPosts", client.get_top_ten_posts(request)).await
    }

    async fn get_top_ten_users(&self, request: Request<TopTenParameter>) -> RpcResult<TopTenUsersResponse> {
        let mut client = self.inner.clone();
        observe(STATISTIC_SERVICE, "GetTopTenUsers", client.get_top_ten_users(request)).await
    }
}
