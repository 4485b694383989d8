//! Inference request construction.
//!
//! Serializes a [`Corpus`] and the fixed characteristic schema into one
//! natural-language prompt. Post and comment excerpts are hard-truncated to a
//! character budget so the request size stays bounded regardless of corpus
//! size.

use std::fmt::Write;

use crate::corpus::Corpus;
use crate::schema::CharacteristicSlot;

/// Default character budget for each of the post and comment excerpts.
pub const EXCERPT_CHAR_BUDGET: usize = 4000;

const INSTRUCTIONS: &str = "\
IMPORTANT:
- Use ONLY actual quotes from the user's posts and comments as evidence
- If information is not available or unclear, state \"Unknown\" for the value
- Be specific and cite real content, not generic statements
- Focus on what can be reasonably inferred from the available content
- Ensure all evidence quotes are actual text from the user's content";

/// Knobs for request construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Character cutoff for the posts excerpt.
    pub post_char_budget: usize,
    /// Character cutoff for the comments excerpt.
    pub comment_char_budget: usize,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            post_char_budget: EXCERPT_CHAR_BUDGET,
            comment_char_budget: EXCERPT_CHAR_BUDGET,
        }
    }
}

/// Build the characteristic-inference request for a corpus.
pub fn build_request(corpus: &Corpus, options: &RequestOptions) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Analyze this Reddit user's profile and create a detailed user persona. \
         Based on their posts and comments, extract the following characteristics:\n\n",
    );

    prompt.push_str("USER DATA:\n");
    let _ = writeln!(prompt, "Username: {}", corpus.username());
    let _ = writeln!(prompt, "Account Age: {:.0} days", corpus.account_age_days());
    let _ = writeln!(prompt, "Total Karma: {}", corpus.total_karma());
    let _ = writeln!(prompt, "Posts: {}", corpus.total_posts());
    let _ = writeln!(prompt, "Comments: {}", corpus.total_comments());
    let _ = writeln!(prompt, "Top Subreddits: {}", top_subreddits_line(corpus));

    prompt.push_str("\nPOSTS:\n");
    prompt.push_str(&truncate_chars(&posts_excerpt(corpus), options.post_char_budget));
    prompt.push_str("\n\nCOMMENTS:\n");
    prompt.push_str(&truncate_chars(
        &comments_excerpt(corpus),
        options.comment_char_budget,
    ));

    prompt.push_str(
        "\n\nPlease analyze and provide a JSON response with the following structure. \
         For each characteristic, provide the inferred value and cite specific \
         posts/comments that support your inference. Use actual quotes from the \
         user's content:\n\n",
    );
    prompt.push_str(&schema_skeleton());
    prompt.push_str("\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');

    prompt
}

fn top_subreddits_line(corpus: &Corpus) -> String {
    if corpus.top_subreddits().is_empty() {
        return "none".to_string();
    }
    corpus
        .top_subreddits()
        .iter()
        .map(|entry| format!("{} ({})", entry.name, entry.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `POST: {title} - {content}` lines; link posts without a body are skipped.
fn posts_excerpt(corpus: &Corpus) -> String {
    corpus
        .posts()
        .iter()
        .filter(|post| !post.body.is_empty())
        .map(|post| {
            format!(
                "POST: {} - {}",
                post.title.as_deref().unwrap_or_default(),
                post.body
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn comments_excerpt(corpus: &Corpus) -> String {
    corpus
        .comments()
        .iter()
        .map(|comment| format!("COMMENT: {}", comment.body))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` after `budget` characters. Not sentence-aware.
fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// The JSON skeleton listing every slot with its value/reasoning/evidence hints.
fn schema_skeleton() -> String {
    let mut out = String::from("{\n");
    let last = CharacteristicSlot::COUNT - 1;
    for (i, slot) in CharacteristicSlot::ALL.iter().enumerate() {
        let entry = serde_json::json!({
            "value": slot.value_hint(),
            "reasoning": slot.reasoning_hint(),
            "evidence": [slot.evidence_hint()],
        });
        let _ = write!(out, "    \"{}\": {}", slot.key(), entry);
        out.push_str(if i == last { "\n" } else { ",\n" });
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{aggregate_at, AccountMeta, RawComment, RawPost, UserContent};

    fn post(title: &str, content: &str) -> RawPost {
        RawPost {
            title: title.to_string(),
            content: content.to_string(),
            url: "https://reddit.com/r/rust/comments/1".to_string(),
            subreddit: "rust".to_string(),
            score: 10,
            created_utc: 1000.0,
            upvote_ratio: None,
            num_comments: None,
        }
    }

    fn comment(content: &str) -> RawComment {
        RawComment {
            content: content.to_string(),
            url: "https://reddit.com/r/rust/comments/1/c".to_string(),
            subreddit: "learnrust".to_string(),
            score: 3,
            created_utc: 2000.0,
            parent_id: None,
        }
    }

    fn corpus(posts: Vec<RawPost>, comments: Vec<RawComment>) -> Corpus {
        aggregate_at(
            UserContent {
                username: "ferris".to_string(),
                posts,
                comments,
                account: AccountMeta {
                    created_utc: 0.0,
                    comment_karma: 40,
                    link_karma: 2,
                },
            },
            86_400.0 * 30.0,
        )
        .unwrap()
    }

    #[test]
    fn test_request_contains_user_summary() {
        let c = corpus(vec![post("Learning Rust", "Loving it")], vec![comment("same")]);
        let prompt = build_request(&c, &RequestOptions::default());
        assert!(prompt.contains("Username: ferris"));
        assert!(prompt.contains("Account Age: 30 days"));
        assert!(prompt.contains("Total Karma: 42"));
        assert!(prompt.contains("Posts: 1"));
        assert!(prompt.contains("Comments: 1"));
        assert!(prompt.contains("rust (1), learnrust (1)"));
    }

    #[test]
    fn test_items_rendered_with_prefixes() {
        let c = corpus(
            vec![post("Learning Rust", "Loving it"), post("A link", "")],
            vec![comment("borrowck is fine")],
        );
        let prompt = build_request(&c, &RequestOptions::default());
        assert!(prompt.contains("POST: Learning Rust - Loving it"));
        assert!(!prompt.contains("POST: A link"));
        assert!(prompt.contains("COMMENT: borrowck is fine"));
    }

    #[test]
    fn test_every_slot_requests_verbatim_evidence() {
        let c = corpus(vec![post("t", "b")], vec![]);
        let prompt = build_request(&c, &RequestOptions::default());
        for slot in CharacteristicSlot::ALL {
            assert!(prompt.contains(&format!("\"{}\":", slot.key())), "{}", slot);
        }
        assert!(prompt.contains("\"evidence\""));
        assert!(prompt.contains("Use ONLY actual quotes"));
    }

    #[test]
    fn test_excerpts_are_hard_truncated() {
        let long = "a".repeat(10_000);
        let c = corpus(vec![post("t", &long)], vec![comment(&"b".repeat(10_000))]);
        let prompt = build_request(
            &c,
            &RequestOptions {
                post_char_budget: 50,
                comment_char_budget: 20,
            },
        );
        let expected_posts = format!("POST: t - {}", "a".repeat(40));
        assert!(prompt.contains(&format!("POSTS:\n{}\n\nCOMMENTS:", expected_posts)));
        let expected_comments = format!("COMMENT: {}", "b".repeat(11));
        assert!(prompt.contains(&format!("COMMENTS:\n{}\n\n", expected_comments)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééééé", 2), "éé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_default_budget_bounds_request_size() {
        let posts: Vec<RawPost> = (0..200)
            .map(|i| post("t", &format!("body {}", i).repeat(50)))
            .collect();
        let small = build_request(
            &corpus(vec![post("t", "b")], vec![]),
            &RequestOptions::default(),
        );
        let large = build_request(&corpus(posts, vec![]), &RequestOptions::default());
        assert!(large.chars().count() <= small.chars().count() + EXCERPT_CHAR_BUDGET);
    }
}
