//! Corpus model: the addressable set of a user's posts and comments.
//!
//! A [`Corpus`] is produced once by the [`aggregator`] and is read-only
//! afterwards. The request builder, the evidence matcher and the persona
//! assembler all borrow it; nothing mutates it after aggregation.

pub mod aggregator;
pub mod records;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use aggregator::{aggregate, aggregate_at, TOP_SUBREDDIT_LIMIT};
pub use records::{AccountMeta, RawComment, RawPost, UserContent};

/// Seconds in one day, used for account-age arithmetic.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// SourceKind
// ---------------------------------------------------------------------------

/// Which collection a source item (or a citation) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Post,
    Comment,
    /// Only used by unverifiable citations; never by a corpus item.
    Unknown,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SourceItem
// ---------------------------------------------------------------------------

/// One post or comment inside a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub kind: SourceKind,
    /// Post title; always `None` for comments.
    pub title: Option<String>,
    pub body: String,
    pub url: String,
    pub subreddit: String,
    pub score: i64,
    /// Creation time in epoch seconds.
    pub created_utc: f64,
    /// Parent fullname; comments only.
    pub parent_id: Option<String>,
    pub upvote_ratio: Option<f64>,
    pub num_comments: Option<u64>,
}

impl From<RawPost> for SourceItem {
    fn from(post: RawPost) -> Self {
        Self {
            kind: SourceKind::Post,
            title: Some(post.title),
            body: post.content,
            url: post.url,
            subreddit: post.subreddit,
            score: post.score,
            created_utc: post.created_utc,
            parent_id: None,
            upvote_ratio: post.upvote_ratio,
            num_comments: post.num_comments,
        }
    }
}

impl From<RawComment> for SourceItem {
    fn from(comment: RawComment) -> Self {
        Self {
            kind: SourceKind::Comment,
            title: None,
            body: comment.content,
            url: comment.url,
            subreddit: comment.subreddit,
            score: comment.score,
            created_utc: comment.created_utc,
            parent_id: comment.parent_id,
            upvote_ratio: None,
            num_comments: None,
        }
    }
}

/// Occurrence count of one subreddit across posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditCount {
    pub name: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// A user's posts and comments plus metadata derived at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Corpus {
    username: String,
    account: AccountMeta,
    posts: Vec<SourceItem>,
    comments: Vec<SourceItem>,
    /// Frequency table in first-seen order.
    subreddit_frequency: Vec<SubredditCount>,
    top_subreddits: Vec<SubredditCount>,
    total_karma: i64,
    account_age_days: f64,
}

impl Corpus {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn account(&self) -> &AccountMeta {
        &self.account
    }

    /// Posts in fetch order.
    pub fn posts(&self) -> &[SourceItem] {
        &self.posts
    }

    /// Comments in fetch order.
    pub fn comments(&self) -> &[SourceItem] {
        &self.comments
    }

    pub fn total_posts(&self) -> usize {
        self.posts.len()
    }

    pub fn total_comments(&self) -> usize {
        self.comments.len()
    }

    pub fn total_karma(&self) -> i64 {
        self.total_karma
    }

    /// Account age in fractional days.
    pub fn account_age_days(&self) -> f64 {
        self.account_age_days
    }

    /// Account age truncated to whole days.
    pub fn account_age_whole_days(&self) -> i64 {
        self.account_age_days.trunc() as i64
    }

    /// Every subreddit observed, in first-seen order, with its count.
    pub fn subreddit_frequency(&self) -> &[SubredditCount] {
        &self.subreddit_frequency
    }

    /// Occurrence count for a single subreddit (0 when never seen).
    pub fn subreddit_count(&self, name: &str) -> usize {
        self.subreddit_frequency
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// The most active subreddits, busiest first.
    pub fn top_subreddits(&self) -> &[SubredditCount] {
        &self.top_subreddits
    }
}
