//! Protobuf messages and clients generated from `proto/*.proto`.
//!
//! Messages of both packages are re-exported flat; `statistic` reuses
//! `posts.PostId`.

pub mod posts {
    tonic::include_proto!("posts");
}

pub mod statistic {
    tonic::include_proto!("statistic");
}

pub use posts::{
    CommentDataResponse, ListCommentsResponse, ListPostsResponse, PaginatedListRequest, PostCommentRequest,
    PostDataRequest, PostDataResponse, PostId, UpdatePostRequest,
};
pub use statistic::{
    CountResponse, DynamicListResponse, DynamicResponse, TopTenParameter, TopTenPostsResponse, TopTenUsersResponse,
    UserId,
};
