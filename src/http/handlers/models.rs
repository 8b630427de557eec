//! Public JSON shapes and their conversion from backend messages.
//!
//! Field names follow the public API (`post_ID`, `user_ID`, ...), not the
//! protobuf field names. Timestamps are rendered in the host's local zone.

use chrono::{DateTime, Local};
use prost_types::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::backend::proto::{
    CommentDataResponse, CountResponse, DynamicListResponse, DynamicResponse, ListCommentsResponse,
    ListPostsResponse, PostDataRequest, PostDataResponse, TopTenPostsResponse, TopTenUsersResponse,
};

// ---- request bodies ----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostBody {
    pub post_name: String,
    pub post_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub security_flag: bool,
}

impl From<CreatePostBody> for PostDataRequest {
    fn from(body: CreatePostBody) -> Self {
        PostDataRequest {
            post_name: body.post_name,
            post_description: body.post_description,
            tags: body.tags,
            security_flag: body.security_flag,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostIdBody {
    #[serde(alias = "post_ID")]
    pub post_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostBody {
    #[serde(alias = "post_ID")]
    pub post_id: i32,
    pub post_name: String,
    pub post_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub security_flag: bool,
}

impl UpdatePostBody {
    pub fn into_parts(self) -> (i32, PostDataRequest) {
        let data = PostDataRequest {
            post_name: self.post_name,
            post_description: self.post_description,
            tags: self.tags,
            security_flag: self.security_flag,
        };
        (self.post_id, data)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentBody {
    #[serde(alias = "post_ID")]
    pub post_id: i32,
    pub description: String,
}

// ---- response views ----

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct PostView {
    #[serde(rename = "post_ID")]
    pub post_id: i32,
    pub post_name: String,
    pub post_description: String,
    pub security_flag: bool,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
    pub tags: Vec<String>,
    #[serde(rename = "user_ID")]
    pub user_id: i32,
}

impl From<PostDataResponse> for PostView {
    fn from(post: PostDataResponse) -> Self {
        PostView {
            post_id: post.post_id,
            created_at: post.created_at.as_ref().and_then(localize),
            updated_at: post.updated_at.as_ref().and_then(localize),
            post_name: post.post_name,
            post_description: post.post_description,
            security_flag: post.security_flag,
            tags: post.tags,
            user_id: post.user_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListView {
    pub posts: Vec<PostView>,
}

impl From<ListPostsResponse> for PostListView {
    fn from(list: ListPostsResponse) -> Self {
        PostListView {
            posts: list.posts.into_iter().map(PostView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct CommentView {
    #[serde(rename = "comment_ID")]
    pub comment_id: i32,
    #[serde(rename = "user_ID")]
    pub user_id: i32,
    #[serde(rename = "post_ID")]
    pub post_id: i32,
    pub description: String,
}

impl From<CommentDataResponse> for CommentView {
    fn from(comment: CommentDataResponse) -> Self {
        CommentView {
            comment_id: comment.comment_id,
            user_id: comment.user_id,
            post_id: comment.post_id,
            description: comment.comment_description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListView {
    pub comments: Vec<CommentView>,
}

impl From<ListCommentsResponse> for CommentListView {
    fn from(list: ListCommentsResponse) -> Self {
        CommentListView {
            comments: list.comments.into_iter().map(CommentView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct CountView {
    pub count: i32,
}

impl From<CountResponse> for CountView {
    fn from(count: CountResponse) -> Self {
        CountView { count: count.count }
    }
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct DynamicView {
    pub count: i32,
    pub date: Option<DateTime<Local>>,
}

impl From<DynamicResponse> for DynamicView {
    fn from(point: DynamicResponse) -> Self {
        DynamicView {
            count: point.count.map(|c| c.count).unwrap_or_default(),
            date: point.data.as_ref().and_then(localize),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DynamicListView {
    pub dynamic: Vec<DynamicView>,
}

impl From<DynamicListResponse> for DynamicListView {
    fn from(list: DynamicListResponse) -> Self {
        DynamicListView {
            dynamic: list.dynamic.into_iter().map(DynamicView::from).collect(),
        }
    }
}

/// Ranked identifiers, best first.
#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct TopTenView {
    pub top: Vec<i32>,
}

impl From<TopTenPostsResponse> for TopTenView {
    fn from(ranking: TopTenPostsResponse) -> Self {
        TopTenView {
            top: ranking.posts.into_iter().map(|p| p.post_id).collect(),
        }
    }
}

impl From<TopTenUsersResponse> for TopTenView {
    fn from(ranking: TopTenUsersResponse) -> Self {
        TopTenView {
            top: ranking.users.into_iter().map(|u| u.user_id).collect(),
        }
    }
}

/// Convert a protobuf timestamp to the host's local time zone.
///
/// Out-of-range values render as `null` rather than failing the request.
pub fn localize(ts: &Timestamp) -> Option<DateTime<Local>> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    DateTime::from_timestamp(ts.seconds, nanos).map(|utc| utc.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::proto::{PostId, UserId};

    #[test]
    fn test_post_view_renames_fields() {
        let post = PostDataResponse {
            post_id: 7,
            post_name: "hello".into(),
            post_description: "world".into(),
            security_flag: true,
            created_at: Some(Timestamp { seconds: 1_700_000_000, nanos: 0 }),
            updated_at: None,
            tags: vec!["rust".into()],
            user_id: 42,
        };

        let json = serde_json::to_value(PostView::from(post)).unwrap();

        assert_eq!(json["post_ID"], 7);
        assert_eq!(json["user_ID"], 42);
        assert_eq!(json["tags"][0], "rust");
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_null());
        assert!(json.get("post_id").is_none());
    }

    #[test]
    fn test_localize_preserves_instant() {
        let local = localize(&Timestamp { seconds: 1_700_000_000, nanos: 5 }).unwrap();
        assert_eq!(local.timestamp(), 1_700_000_000);
        assert_eq!(local.timestamp_subsec_nanos(), 5);

        assert!(localize(&Timestamp { seconds: 0, nanos: -1 }).is_none());
    }

    #[test]
    fn test_body_accepts_legacy_post_id_spelling() {
        let body: PostIdBody = serde_json::from_str(r#"{"post_ID": 3}"#).unwrap();
        assert_eq!(body.post_id, 3);
        let body: PostIdBody = serde_json::from_str(r#"{"post_id": 4}"#).unwrap();
        assert_eq!(body.post_id, 4);
        assert!(serde_json::from_str::<PostIdBody>(r#"{"post_id": "x"}"#).is_err());
    }

    #[test]
    fn test_comment_and_ranking_views() {
        let comment = CommentView::from(CommentDataResponse {
            comment_id: 1,
            post_id: 2,
            user_id: 3,
            comment_description: "nice".into(),
        });
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["comment_ID"], 1);
        assert_eq!(json["description"], "nice");

        let posts = TopTenView::from(TopTenPostsResponse {
            posts: vec![PostId { post_id: 9 }, PostId { post_id: 4 }],
        });
        assert_eq!(posts.top, vec![9, 4]);
        let users = TopTenView::from(TopTenUsersResponse {
            users: vec![UserId { user_id: 5 }],
        });
        assert_eq!(users.top, vec![5]);
    }
}
