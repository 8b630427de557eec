//! Handlers for the statistic service. These are public: no identity is
//! required and none is forwarded.

use axum::response::{IntoResponse, Response};
use axum::Json;
use tonic::Request;

use super::models::{CountView, DynamicListView, TopTenView};
use super::params::{required_post_id, TopParameter};
use crate::backend::proto::{PostId, TopTenParameter};
use crate::backend::Backends;
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayError;

fn post_id_request(request: &GatewayRequest) -> Result<Request<PostId>, GatewayError> {
    let post_id = required_post_id(&request.query_params()?)?;
    Ok(Request::new(PostId { post_id }))
}

fn top_request(request: &GatewayRequest) -> Result<Request<TopTenParameter>, GatewayError> {
    let parameter = TopParameter::from_query(&request.query_params()?)?;
    Ok(Request::new(TopTenParameter {
        par: parameter.as_str().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/get_views_count",
    tag = "Statistic",
    summary = "Views of a post",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Number of views", body = CountView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_views_count(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let count = backends
        .statistic
        .get_views_count(outbound)
        .await?
        .into_inner();
    Ok(Json(CountView::from(count)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_likes_count",
    tag = "Statistic",
    summary = "Likes of a post",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Number of likes", body = CountView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_likes_count(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let count = backends
        .statistic
        .get_likes_count(outbound)
        .await?
        .into_inner();
    Ok(Json(CountView::from(count)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_comments_count",
    tag = "Statistic",
    summary = "Comments on a post",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Number of comments", body = CountView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_comments_count(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let count = backends
        .statistic
        .get_comments_count(outbound)
        .await?
        .into_inner();
    Ok(Json(CountView::from(count)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_views_dynamic",
    tag = "Statistic",
    summary = "Views of a post over time",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Views over time", body = DynamicListView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_views_dynamic(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let series = backends
        .statistic
        .get_views_dynamic(outbound)
        .await?
        .into_inner();
    Ok(Json(DynamicListView::from(series)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_likes_dynamic",
    tag = "Statistic",
    summary = "Likes of a post over time",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Likes over time", body = DynamicListView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_likes_dynamic(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let series = backends
        .statistic
        .get_likes_dynamic(outbound)
        .await?
        .into_inner();
    Ok(Json(DynamicListView::from(series)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_comments_dynamic",
    tag = "Statistic",
    summary = "Comments on a post over time",
    params(("post_id" = i32, Query, description = "Post identifier")),
    responses(
        (status = 200, description = "Comments over time", body = DynamicListView),
        (status = 400, description = "Missing or non-numeric post_id", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_comments_dynamic(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = post_id_request(&request)?;
    let series = backends
        .statistic
        .get_comments_dynamic(outbound)
        .await?
        .into_inner();
    Ok(Json(DynamicListView::from(series)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_top_ten_posts",
    tag = "Statistic",
    summary = "Ten best posts",
    params(("parameter" = String, Query, description = "One of views, likes, comments")),
    responses(
        (status = 200, description = "Post ids, best first", body = TopTenView),
        (status = 400, description = "Missing or unknown parameter", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_top_ten_posts(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = top_request(&request)?;
    let ranking = backends
        .statistic
        .get_top_ten_posts(outbound)
        .await?
        .into_inner();
    Ok(Json(TopTenView::from(ranking)).into_response())
}

#[utoipa::path(
    get,
    path = "/get_top_ten_users",
    tag = "Statistic",
    summary = "Ten most active users",
    params(("parameter" = String, Query, description = "One of views, likes, comments")),
    responses(
        (status = 200, description = "User ids, best first", body = TopTenView),
        (status = 400, description = "Missing or unknown parameter", body = String),
        (status = 500, description = "Statistic service error", body = String)
    )
)]
pub async fn get_top_ten_users(backends: Backends, request: GatewayRequest) -> Result<Response, GatewayError> {
    let outbound = top_request(&request)?;
    let ranking = backends
        .statistic
        .get_top_ten_users(outbound)
        .await?
        .into_inner();
    Ok(Json(TopTenView::from(ranking)).into_response())
}
