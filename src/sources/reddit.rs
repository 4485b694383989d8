//! Reddit content source.
//!
//! Authenticates with the app-only OAuth flow (client credentials) and reads
//! the user's `about`, `submitted` and `comments` listings. Only the first
//! page of each listing is fetched, so `limit` is clamped to the API's page
//! maximum.

use std::time::Duration;

use serde::Deserialize;

use super::ContentSource;
use crate::config::RedditConfig;
use crate::corpus::{AccountMeta, RawComment, RawPost, UserContent};
use crate::error::{PersonaError, Result};

/// Largest page the listing endpoints return.
pub const MAX_PAGE_SIZE: usize = 100;

const PERMALINK_HOST: &str = "https://reddit.com";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct AboutData {
    created_utc: f64,
    #[serde(default)]
    comment_karma: i64,
    #[serde(default)]
    link_karma: i64,
}

#[derive(Debug, Deserialize)]
struct SubmissionData {
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
    subreddit: String,
    #[serde(default)]
    score: i64,
    created_utc: f64,
    #[serde(default)]
    upvote_ratio: Option<f64>,
    #[serde(default)]
    num_comments: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    body: String,
    permalink: String,
    subreddit: String,
    #[serde(default)]
    score: i64,
    created_utc: f64,
    #[serde(default)]
    parent_id: Option<String>,
}

impl From<SubmissionData> for RawPost {
    fn from(data: SubmissionData) -> Self {
        Self {
            title: data.title,
            content: data.selftext,
            url: format!("{}{}", PERMALINK_HOST, data.permalink),
            subreddit: data.subreddit,
            score: data.score,
            created_utc: data.created_utc,
            upvote_ratio: data.upvote_ratio,
            num_comments: data.num_comments,
        }
    }
}

impl From<CommentData> for RawComment {
    fn from(data: CommentData) -> Self {
        Self {
            content: data.body,
            url: format!("{}{}", PERMALINK_HOST, data.permalink),
            subreddit: data.subreddit,
            score: data.score,
            created_utc: data.created_utc,
            parent_id: data.parent_id,
        }
    }
}

// ---------------------------------------------------------------------------
// RedditSource
// ---------------------------------------------------------------------------

/// Fetches a user's public activity from the Reddit API.
#[derive(Debug, Clone)]
pub struct RedditSource {
    config: RedditConfig,
    client: reqwest::Client,
}

impl RedditSource {
    pub fn new(config: RedditConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PersonaError::fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.config.auth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PersonaError::fetch(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersonaError::fetch(format!(
                "token request rejected ({})",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PersonaError::fetch(format!("invalid token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn get_json<T>(&self, token: &str, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| PersonaError::fetch(format!("GET {} failed: {}", path, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PersonaError::fetch(format!("{} not found", path)));
        }
        if !status.is_success() {
            return Err(PersonaError::fetch(format!("GET {} returned {}", path, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PersonaError::fetch(format!("reading {} failed: {}", path, e)))?;
        serde_json::from_str(&body)
            .map_err(|e| PersonaError::fetch(format!("unexpected payload from {}: {}", path, e)))
    }

    async fn fetch(&self, username: &str, limit: usize) -> Result<UserContent> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let token = self.access_token().await?;
        let listing_query = [("limit", limit.to_string()), ("sort", "new".to_string())];

        let about: Thing<AboutData> = self
            .get_json(&token, &format!("/user/{}/about", username), &[])
            .await?;

        log::info!("Fetching posts for u/{}", username);
        let submitted: Thing<Listing<SubmissionData>> = self
            .get_json(&token, &format!("/user/{}/submitted", username), &listing_query)
            .await?;

        log::info!("Fetching comments for u/{}", username);
        let comments: Thing<Listing<CommentData>> = self
            .get_json(&token, &format!("/user/{}/comments", username), &listing_query)
            .await?;

        Ok(to_user_content(username, about, submitted, comments))
    }
}

impl ContentSource for RedditSource {
    fn name(&self) -> &str {
        "reddit"
    }

    fn fetch_user_content(&self, username: &str, limit: usize) -> Result<UserContent> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PersonaError::fetch(format!("failed to start runtime: {}", e)))?;
        let content = rt.block_on(self.fetch(username, limit))?;
        log::info!(
            "Found {} posts and {} comments for u/{}",
            content.posts.len(),
            content.comments.len(),
            username
        );
        Ok(content)
    }
}

fn to_user_content(
    username: &str,
    about: Thing<AboutData>,
    submitted: Thing<Listing<SubmissionData>>,
    comments: Thing<Listing<CommentData>>,
) -> UserContent {
    UserContent {
        username: username.to_string(),
        posts: submitted
            .data
            .children
            .into_iter()
            .map(|thing| RawPost::from(thing.data))
            .collect(),
        comments: comments
            .data
            .children
            .into_iter()
            .map(|thing| RawComment::from(thing.data))
            .collect(),
        account: AccountMeta {
            created_utc: about.data.created_utc,
            comment_karma: about.data.comment_karma,
            link_karma: about.data.link_karma,
        },
    }
}
