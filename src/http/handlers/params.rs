//! Query-string parameters.
//!
//! Identifiers are strict: a missing or non-numeric `post_id` is a 400.
//! Pagination is lenient and falls back to page 1 of 10.

use std::collections::HashMap;

use crate::http::response::GatewayError;

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_PAGE_SIZE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
}

impl Pagination {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        Self {
            page: positive_or(params.get("page"), DEFAULT_PAGE),
            page_size: positive_or(params.get("page_size"), DEFAULT_PAGE_SIZE),
        }
    }
}

fn positive_or(raw: Option<&String>, fallback: i32) -> i32 {
    raw.and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(fallback)
}

/// Post identifier from `post_id` (or the legacy `post_ID`).
pub fn required_post_id(params: &HashMap<String, String>) -> Result<i32, GatewayError> {
    let raw = params
        .get("post_id")
        .or_else(|| params.get("post_ID"))
        .ok_or_else(|| GatewayError::BadRequest("post_id is required".into()))?;

    raw.trim()
        .parse()
        .map_err(|_| GatewayError::BadRequest(format!("post_id must be an integer, got {raw:?}")))
}

/// Ranking dimension for the top-ten endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopParameter {
    Views,
    Likes,
    Comments,
}

impl TopParameter {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, GatewayError> {
        match params.get("parameter").map(|v| v.trim()) {
            Some("views") => Ok(TopParameter::Views),
            Some("likes") => Ok(TopParameter::Likes),
            Some("comments") => Ok(TopParameter::Comments),
            Some(other) => Err(GatewayError::BadRequest(format!(
                "parameter must be one of views, likes, comments; got {other:?}"
            ))),
            None => Err(GatewayError::BadRequest("parameter is required".into())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TopParameter::Views => "views",
            TopParameter::Likes => "likes",
            TopParameter::Comments => "comments",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(
            Pagination::from_query(&query(&[])),
            Pagination { page: 1, page_size: 10 }
        );
        assert_eq!(
            Pagination::from_query(&query(&[("page", "0"), ("page_size", "-5")])),
            Pagination { page: 1, page_size: 10 }
        );
        assert_eq!(
            Pagination::from_query(&query(&[("page", "two"), ("page_size", "")])),
            Pagination { page: 1, page_size: 10 }
        );
        assert_eq!(
            Pagination::from_query(&query(&[("page", "3"), ("page_size", "25")])),
            Pagination { page: 3, page_size: 25 }
        );
    }

    #[test]
    fn test_post_id_is_strict() {
        assert_eq!(required_post_id(&query(&[("post_id", "7")])).unwrap(), 7);
        assert_eq!(required_post_id(&query(&[("post_ID", "8")])).unwrap(), 8);
        assert!(required_post_id(&query(&[])).is_err());
        assert!(required_post_id(&query(&[("post_id", "abc")])).is_err());
        assert!(required_post_id(&query(&[("post_id", "1.5")])).is_err());
    }

    #[test]
    fn test_top_parameter() {
        assert_eq!(
            TopParameter::from_query(&query(&[("parameter", "likes")])).unwrap(),
            TopParameter::Likes
        );
        assert!(TopParameter::from_query(&query(&[("parameter", "shares")])).is_err());
        assert!(TopParameter::from_query(&query(&[])).is_err());
        assert_eq!(TopParameter::Comments.as_str(), "comments");
    }
}
