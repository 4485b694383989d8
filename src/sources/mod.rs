//! Content sources: where a user's posts and comments come from.

pub mod identifier;
pub mod reddit;

use std::fmt;

use crate::corpus::UserContent;
use crate::error::Result;

pub use identifier::extract_username;
pub use reddit::RedditSource;

/// Fetches a user's public activity.
///
/// Implementations own authentication and paging. Any failure is reported as
/// [`PersonaError::Fetch`](crate::error::PersonaError::Fetch) and ends the
/// pipeline run.
pub trait ContentSource: Send + Sync + fmt::Debug {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch up to `limit` posts and up to `limit` comments, newest first.
    fn fetch_user_content(&self, username: &str, limit: usize) -> Result<UserContent>;
}
