//! Evidence matching.
//!
//! Grounds each quote the inference backend claims as evidence in the corpus
//! it was given. A quote is normalized (trimmed, lower-cased) and searched as
//! a plain substring: posts first (body, then title), then comments (body),
//! each in corpus order. The first item that contains it wins. There is no
//! ranking and no fuzzy matching, so the same corpus and quote always yield
//! the same citation.
//!
//! When nothing matches the result is the sentinel
//! [`Citation::unverifiable`]. That is a valid outcome, not an error: it
//! records that the backend's claim could not be verified.

use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, SourceItem, SourceKind};

/// A link from a claimed quote back to the source item that contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// The quote exactly as claimed.
    pub quote: String,
    pub kind: SourceKind,
    pub url: String,
    pub subreddit: String,
    /// Creation time of the cited item in epoch seconds; 0 when unverifiable.
    pub created_utc: f64,
    pub score: i64,
}

impl Citation {
    fn from_item(quote: &str, item: &SourceItem) -> Self {
        Self {
            quote: quote.to_string(),
            kind: item.kind,
            url: item.url.clone(),
            subreddit: item.subreddit.clone(),
            created_utc: item.created_utc,
            score: item.score,
        }
    }

    /// The sentinel for a quote found in no source item.
    pub fn unverifiable(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            kind: SourceKind::Unknown,
            url: String::new(),
            subreddit: String::new(),
            created_utc: 0.0,
            score: 0,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.kind != SourceKind::Unknown
    }
}

/// Find the source of one claimed quote.
///
/// A quote that is empty after trimming cannot be attributed and yields the
/// sentinel citation.
pub fn match_quote(quote: &str, corpus: &Corpus) -> Citation {
    let needle = quote.trim().to_lowercase();
    if needle.is_empty() {
        return Citation::unverifiable(quote);
    }

    let in_post = |post: &&SourceItem| {
        post.body.to_lowercase().contains(&needle)
            || post
                .title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
    };
    if let Some(post) = corpus.posts().iter().find(in_post) {
        return Citation::from_item(quote, post);
    }

    if let Some(comment) = corpus
        .comments()
        .iter()
        .find(|comment| comment.body.to_lowercase().contains(&needle))
    {
        return Citation::from_item(quote, comment);
    }

    log::debug!("Unverifiable evidence quote: {:?}", truncate(quote, 80));
    Citation::unverifiable(quote)
}

/// Match every quote in order. Duplicates are kept.
pub fn match_all<S: AsRef<str>>(quotes: &[S], corpus: &Corpus) -> Vec<Citation> {
    quotes
        .iter()
        .map(|quote| match_quote(quote.as_ref(), corpus))
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{aggregate_at, AccountMeta, RawComment, RawPost, UserContent};

    fn learning_rust_post() -> RawPost {
        RawPost {
            title: "Learning Rust".to_string(),
            content: "I started using Rust last week and love the compiler errors.".to_string(),
            url: "https://reddit.com/r/rust/comments/abc/learning_rust/".to_string(),
            subreddit: "rust".to_string(),
            score: 10,
            created_utc: 1000.0,
            upvote_ratio: Some(0.98),
            num_comments: Some(3),
        }
    }

    fn comment(content: &str, subreddit: &str, score: i64) -> RawComment {
        RawComment {
            content: content.to_string(),
            url: format!("https://reddit.com/r/{}/comments/abc/x/{}", subreddit, score),
            subreddit: subreddit.to_string(),
            score,
            created_utc: 2000.0 + score as f64,
            parent_id: Some("t3_abc".to_string()),
        }
    }

    fn corpus(posts: Vec<RawPost>, comments: Vec<RawComment>) -> Corpus {
        aggregate_at(
            UserContent {
                username: "ferris".to_string(),
                posts,
                comments,
                account: AccountMeta::default(),
            },
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_quote_in_post_body() {
        let c = corpus(vec![learning_rust_post()], vec![]);
        let citation = match_quote("I started using Rust last week", &c);
        assert_eq!(citation.kind, SourceKind::Post);
        assert_eq!(citation.subreddit, "rust");
        assert_eq!(citation.score, 10);
        assert_eq!(citation.created_utc, 1000.0);
        assert_eq!(citation.url, "https://reddit.com/r/rust/comments/abc/learning_rust/");
        assert!(citation.is_verified());
    }

    #[test]
    fn test_unrelated_quote_is_unverifiable() {
        let c = corpus(vec![learning_rust_post()], vec![]);
        let citation = match_quote("completely unrelated text", &c);
        assert_eq!(citation, Citation::unverifiable("completely unrelated text"));
        assert_eq!(citation.kind, SourceKind::Unknown);
        assert!(citation.url.is_empty());
        assert!(citation.subreddit.is_empty());
        assert_eq!(citation.score, 0);
        assert_eq!(citation.created_utc, 0.0);
    }

    #[test]
    fn test_match_is_case_insensitive_and_trimmed() {
        let c = corpus(vec![learning_rust_post()], vec![]);
        let citation = match_quote("  LOVE THE COMPILER ERRORS  ", &c);
        assert_eq!(citation.kind, SourceKind::Post);
        assert_eq!(citation.quote, "  LOVE THE COMPILER ERRORS  ");
    }

    #[test]
    fn test_quote_in_post_title() {
        let c = corpus(vec![learning_rust_post()], vec![]);
        assert_eq!(match_quote("learning rust", &c).kind, SourceKind::Post);
    }

    #[test]
    fn test_posts_searched_before_comments() {
        let c = corpus(
            vec![learning_rust_post()],
            vec![comment("I started using Rust last week too!", "learnrust", 5)],
        );
        let citation = match_quote("I started using Rust last week", &c);
        assert_eq!(citation.kind, SourceKind::Post);
        assert_eq!(citation.subreddit, "rust");
    }

    #[test]
    fn test_comment_match_uses_first_in_order() {
        let c = corpus(
            vec![learning_rust_post()],
            vec![
                comment("my cat is named Ferris", "cats", 7),
                comment("Ferris is also my cat's name", "rust", 9),
            ],
        );
        let citation = match_quote("ferris", &c);
        assert_eq!(citation.kind, SourceKind::Comment);
        assert_eq!(citation.subreddit, "cats");
        assert_eq!(citation.score, 7);
        assert_eq!(citation.created_utc, 2007.0);
    }

    #[test]
    fn test_comment_title_is_not_searched() {
        // Comments have no title; a quote only in a post title must not hit a comment.
        let c = corpus(vec![], vec![comment("body only", "rust", 1)]);
        assert!(!match_quote("Learning Rust", &c).is_verified());
    }

    #[test]
    fn test_empty_quote_is_unverifiable() {
        let c = corpus(vec![learning_rust_post()], vec![]);
        assert!(!match_quote("   ", &c).is_verified());
    }

    #[test]
    fn test_matching_is_deterministic() {
        let c = corpus(
            vec![learning_rust_post(), learning_rust_post()],
            vec![comment("compiler errors", "rust", 1)],
        );
        let first = match_quote("compiler errors", &c);
        for _ in 0..5 {
            assert_eq!(match_quote("compiler errors", &c), first);
        }
    }

    #[test]
    fn test_match_all_preserves_order_and_duplicates() {
        let c = corpus(
            vec![learning_rust_post()],
            vec![comment("tabs over spaces", "programming", 2)],
        );
        let citations = match_all(
            &["tabs over spaces", "nothing here", "tabs over spaces", "Learning Rust"],
            &c,
        );
        let kinds: Vec<SourceKind> = citations.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Comment,
                SourceKind::Unknown,
                SourceKind::Comment,
                SourceKind::Post
            ]
        );
        assert_eq!(citations[0], citations[2]);
    }

    #[test]
    fn test_verified_citation_quote_is_substring_of_source() {
        let c = corpus(
            vec![learning_rust_post()],
            vec![comment("Async Rust is getting better", "rust", 4)],
        );
        for quote in ["async rust", "COMPILER", "Learning"] {
            let citation = match_quote(quote, &c);
            assert!(citation.is_verified());
            let needle = quote.trim().to_lowercase();
            let source = c
                .posts()
                .iter()
                .chain(c.comments())
                .find(|item| item.url == citation.url)
                .unwrap();
            let haystack = format!(
                "{} {}",
                source.body.to_lowercase(),
                source.title.as_deref().unwrap_or_default().to_lowercase()
            );
            assert!(haystack.contains(&needle));
        }
    }
}
