//! OpenAPI description of the public surface, served by Swagger UI.
//!
//! Posts and statistic operations are documented on their handlers. The
//! users-service paths are proxied without a local handler, so their
//! operations are declared here.

#![allow(clippy::needless_for_each)]

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::models::{
    CommentBody, CommentListView, CommentView, CountView, CreatePostBody, DynamicListView, DynamicView,
    PostIdBody, PostListView, PostView, TopTenView, UpdatePostBody,
};
use super::handlers::{posts, statistic};

/// Path the Swagger UI is mounted under.
pub const SWAGGER_PATH: &str = "/swagger";

/// Where the generated document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Social Gateway API",
        version = "0.1.0",
        description = "HTTP/JSON front door for the users, posts and statistic services."
    ),
    tags(
        (name = "Auth", description = "Registration and login, proxied to the users service"),
        (name = "User", description = "Profile of the calling user, proxied to the users service"),
        (name = "Posts", description = "Posts, comments, likes and views"),
        (name = "Statistic", description = "Counters, dynamics and rankings")
    ),
    paths(
        users::register,
        users::login,
        users::get_user_info,
        users::update_user_info,
        posts::create_post,
        posts::get_post,
        posts::get_post_list,
        posts::delete_post,
        posts::update_post,
        posts::post_comment,
        posts::post_like,
        posts::post_view,
        posts::get_comment_list,
        statistic::get_views_count,
        statistic::get_likes_count,
        statistic::get_comments_count,
        statistic::get_views_dynamic,
        statistic::get_likes_dynamic,
        statistic::get_comments_dynamic,
        statistic::get_top_ten_posts,
        statistic::get_top_ten_users,
    ),
    components(schemas(
        users::Credentials, users::UserProfile,
        CreatePostBody, UpdatePostBody, PostIdBody, CommentBody,
        PostView, PostListView, CommentView, CommentListView,
        CountView, DynamicView, DynamicListView, TopTenView,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the `BearerAuth` scheme: a token in the `Authorization` header,
/// with or without the `Bearer ` prefix.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

/// Operations answered by the users service. The gateway forwards the body
/// untouched, so these shapes exist only for the document.
#[allow(dead_code)]
mod users {
    use utoipa::ToSchema;

    #[derive(ToSchema)]
    pub struct Credentials {
        pub login: String,
        pub password: String,
        pub email: String,
    }

    #[derive(ToSchema)]
    pub struct UserProfile {
        pub name: String,
        pub surname: String,
        pub email: String,
        pub password: String,
        pub login: String,
    }

    #[utoipa::path(
        post,
        path = "/register",
        tag = "Auth",
        summary = "Register a user",
        request_body(content = Credentials, description = "New account"),
        responses(
            (status = 200, description = "Registered"),
            (status = 400, description = "Rejected by the users service", body = String),
            (status = 502, description = "Users service unreachable", body = String)
        )
    )]
    pub async fn register() {}

    #[utoipa::path(
        post,
        path = "/login",
        tag = "Auth",
        summary = "Log in and receive a token",
        request_body(content = Credentials, description = "Login and password"),
        responses(
            (status = 200, description = "Signed token", body = String),
            (status = 400, description = "Rejected by the users service", body = String),
            (status = 502, description = "Users service unreachable", body = String)
        )
    )]
    pub async fn login() {}

    #[utoipa::path(
        get,
        path = "/get_user_info",
        tag = "User",
        summary = "Profile of the caller",
        security(("BearerAuth" = [])),
        responses(
            (status = 200, description = "Profile", body = UserProfile),
            (status = 401, description = "Missing or invalid token", body = String),
            (status = 502, description = "Users service unreachable", body = String)
        )
    )]
    pub async fn get_user_info() {}

    #[utoipa::path(
        put,
        path = "/update_user_info",
        tag = "User",
        summary = "Update the caller's profile",
        security(("BearerAuth" = [])),
        request_body(content = UserProfile, description = "New profile"),
        responses(
            (status = 200, description = "Updated"),
            (status = 401, description = "Missing or invalid token", body = String),
            (status = 502, description = "Users service unreachable", body = String)
        )
    )]
    pub async fn update_user_info() {}
}
