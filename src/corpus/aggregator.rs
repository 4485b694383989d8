//! Corpus aggregation.
//!
//! Merges fetched posts and comments into one [`Corpus`] and computes the
//! derived summary: total karma, account age, subreddit frequency and the
//! top subreddits. No I/O happens here.

use std::collections::HashMap;

use chrono::Utc;

use super::{Corpus, SourceItem, SubredditCount, UserContent, SECONDS_PER_DAY};
use crate::error::{PersonaError, Result};

/// Number of subreddits kept in [`Corpus::top_subreddits`].
pub const TOP_SUBREDDIT_LIMIT: usize = 10;

/// Aggregate fetched content using the current wall-clock time.
pub fn aggregate(content: UserContent) -> Result<Corpus> {
    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    aggregate_at(content, now)
}

/// Aggregate fetched content, computing account age relative to `now`
/// (epoch seconds).
///
/// # Errors
///
/// Returns [`PersonaError::EmptyCorpus`] when the user has neither posts
/// nor comments.
pub fn aggregate_at(content: UserContent, now: f64) -> Result<Corpus> {
    if content.is_empty() {
        return Err(PersonaError::EmptyCorpus {
            username: content.username,
        });
    }

    let UserContent {
        username,
        posts,
        comments,
        account,
    } = content;

    let posts: Vec<SourceItem> = posts.into_iter().map(SourceItem::from).collect();
    let comments: Vec<SourceItem> = comments.into_iter().map(SourceItem::from).collect();

    let subreddit_frequency = count_subreddits(posts.iter().chain(comments.iter()));
    let top_subreddits = top_n(&subreddit_frequency, TOP_SUBREDDIT_LIMIT);

    let total_karma = account.comment_karma + account.link_karma;
    let account_age_days = (now - account.created_utc) / SECONDS_PER_DAY;

    log::debug!(
        "Aggregated corpus for u/{}: {} posts, {} comments, {} subreddits",
        username,
        posts.len(),
        comments.len(),
        subreddit_frequency.len(),
    );

    Ok(Corpus {
        username,
        account,
        posts,
        comments,
        subreddit_frequency,
        top_subreddits,
        total_karma,
        account_age_days,
    })
}

/// Count subreddit occurrences, keeping first-seen order.
fn count_subreddits<'a>(items: impl Iterator<Item = &'a SourceItem>) -> Vec<SubredditCount> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<SubredditCount> = Vec::new();

    for item in items {
        match index.get(item.subreddit.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(item.subreddit.as_str(), counts.len());
                counts.push(SubredditCount {
                    name: item.subreddit.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Busiest `n` subreddits. The sort is stable, so ties keep first-seen order.
fn top_n(frequency: &[SubredditCount], n: usize) -> Vec<SubredditCount> {
    let mut sorted = frequency.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}
