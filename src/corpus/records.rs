//! Fetched records as returned by a content source.
//!
//! These are the shapes a [`ContentSource`](crate::sources::ContentSource)
//! hands back before aggregation. They carry everything the platform gives us,
//! including metadata (upvote ratio, comment count) that the pipeline only
//! passes through.

use serde::{Deserialize, Serialize};

/// A submitted post as fetched from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    /// Self-text body; empty for link posts.
    #[serde(default)]
    pub content: String,
    /// Full URL built from the permalink.
    pub url: String,
    pub subreddit: String,
    pub score: i64,
    /// Creation time in epoch seconds.
    pub created_utc: f64,
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub num_comments: Option<u64>,
}

/// A comment as fetched from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    pub content: String,
    pub url: String,
    pub subreddit: String,
    pub score: i64,
    pub created_utc: f64,
    /// Fullname of the parent thing (`t1_…` or `t3_…`).
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Account-level metadata for the analyzed user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Account creation time in epoch seconds.
    pub created_utc: f64,
    pub comment_karma: i64,
    pub link_karma: i64,
}

/// Everything a content source returns for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContent {
    pub username: String,
    pub posts: Vec<RawPost>,
    pub comments: Vec<RawComment>,
    pub account: AccountMeta,
}

impl UserContent {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }
}
