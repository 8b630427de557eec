//! Handlers for the posts service. All of them sit behind the auth guard.

use axum::response::{IntoResponse, Response};
use axum::Json;

use super::models::{
    CommentBody, CommentListView, CreatePostBody, PostIdBody, PostListView, PostView, UpdatePostBody,
};
use super::outbound;
use super::params::{required_post_id, Pagination};
use crate::backend::proto::{PaginatedListRequest, PostCommentRequest, PostDataRequest, PostId, UpdatePostRequest};
use crate::backend::Backends;
use crate::http::request::GatewayRequest;
use crate::http::response::{message, GatewayError};

#[utoipa::path(
    post,
    path = "/create_post",
    tag = "Posts",
    summary = "Create a post",
    security(("BearerAuth" = [])),
    request_body(content = CreatePostBody),
    responses(
        (status = 200, description = "Post is created", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn create_post(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: CreatePostBody = request.json().await?;
    let identity = request.require_identity()?;

    backends
        .posts
        .create_post(outbound(PostDataRequest::from(body), identity))
        .await?;
    Ok(message("Post is created"))
}

#[utoipa::path(
    get,
    path = "/get_post",
    tag = "Posts",
    summary = "Fetch one post",
    security(("BearerAuth" = [])),
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = PostView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn get_post(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let post_id = required_post_id(&request.query_params()?)?;
    let identity = request.require_identity()?;

    let post = backends
        .posts
        .get_post(outbound(PostId { post_id }, identity))
        .await?
        .into_inner();
    Ok(Json(PostView::from(post)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_post_list",
    tag = "Posts",
    summary = "List posts page by page",
    security(("BearerAuth" = [])),
    params(
        ("page" = Option<i32>, Query, description = "Page number, 1 when absent or below 1"),
        ("page_size" = Option<i32>, Query, description = "Page size, 10 when absent or below 1")
    ),
    responses(
        (status = 200, description = "One page of posts", body = PostListView),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn get_post_list(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let page = Pagination::from_query(&request.query_params()?);
    let identity = request.require_identity()?;

    let list = backends
        .posts
        .get_post_list(outbound(
            PaginatedListRequest {
                page: page.page,
                page_size: page.page_size,
            },
            identity,
        ))
        .await?
        .into_inner();
    Ok(Json(PostListView::from(list)).into_response())
}

#[utoipa::path(
    delete,
    path = "/delete_post",
    tag = "Posts",
    summary = "Delete a post",
    security(("BearerAuth" = [])),
    request_body(content = PostIdBody),
    responses(
        (status = 200, description = "Post is deleted", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn delete_post(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: PostIdBody = request.json().await?;
    let identity = request.require_identity()?;

    backends
        .posts
        .delete_post(outbound(PostId { post_id: body.post_id }, identity))
        .await?;
    Ok(message("Post is deleted"))
}

#[utoipa::path(
    put,
    path = "/update_post",
    tag = "Posts",
    summary = "Replace a post's content",
    security(("BearerAuth" = [])),
    request_body(content = UpdatePostBody),
    responses(
        (status = 200, description = "Post is updated", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn update_post(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: UpdatePostBody = request.json().await?;
    let identity = request.require_identity()?;

    let (post_id, post_data) = body.into_parts();
    let update = UpdatePostRequest {
        post_id,
        post_data: Some(post_data),
    };
    backends.posts.update_post(outbound(update, identity)).await?;
    Ok(message("Post is updated"))
}

#[utoipa::path(
    post,
    path = "/post_comment",
    tag = "Posts",
    summary = "Comment on a post",
    security(("BearerAuth" = [])),
    request_body(content = CommentBody),
    responses(
        (status = 200, description = "Comment is posted", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn post_comment(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: CommentBody = request.json().await?;
    let identity = request.require_identity()?;

    let comment = PostCommentRequest {
        post_id: body.post_id,
        comment_description: body.description,
    };
    backends.posts.post_comment(outbound(comment, identity)).await?;
    Ok(message("Comment is posted"))
}

#[utoipa::path(
    post,
    path = "/post_like",
    tag = "Posts",
    summary = "Like a post",
    security(("BearerAuth" = [])),
    request_body(content = PostIdBody),
    responses(
        (status = 200, description = "Like is posted", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn post_like(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: PostIdBody = request.json().await?;
    let identity = request.require_identity()?;

    backends
        .posts
        .post_like(outbound(PostId { post_id: body.post_id }, identity))
        .await?;
    Ok(message("Like is posted"))
}

#[utoipa::path(
    post,
    path = "/post_view",
    tag = "Posts",
    summary = "Record a view of a post",
    security(("BearerAuth" = [])),
    request_body(content = PostIdBody),
    responses(
        (status = 200, description = "View is posted", body = String),
        (status = 400, description = "Malformed body", body = String),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn post_view(backends: Backends, mut request: GatewayRequest) -> Result<Response, GatewayError> {
    let body: PostIdBody = request.json().await?;
    let identity = request.require_identity()?;

    backends
        .posts
        .post_view(outbound(PostId { post_id: body.post_id }, identity))
        .await?;
    Ok(message("View is posted"))
}

#[utoipa::path(
    get,
    path = "/get_comment_list",
    tag = "Posts",
    summary = "List comments page by page",
    security(("BearerAuth" = [])),
    params(
        ("page" = Option<i32>, Query, description = "Page number, 1 when absent or below 1"),
        ("page_size" = Option<i32>, Query, description = "Page size, 10 when absent or below 1")
    ),
    responses(
        (status = 200, description = "One page of comments", body = CommentListView),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 500, description = "Posts service error", body = String)
    )
)]
pub async fn get_comment_list(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let page = Pagination::from_query(&request.query_params()?);
    let identity = request.require_identity()?;

    let list = backends
        .posts
        .get_comment_list(outbound(
            PaginatedListRequest {
                page: page.page,
                page_size: page.page_size,
            },
            identity,
        ))
        .await?
        .into_inner();
    Ok(Json(CommentListView::from(list)).into_response())
}
