//! Persona assembly.
//!
//! Combines a validated inference response with the corpus: every evidence
//! quote of every slot is run through the evidence matcher (order kept, no
//! deduplication) and the result is packaged with corpus-derived metadata.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use super::{Characteristic, Persona, PersonaMetadata};
use crate::corpus::Corpus;
use crate::evidence;
use crate::inference::{ValidatedCharacteristic, ValidatedResponse};
use crate::schema::CharacteristicSlot;

/// Assemble a persona dated today (local time).
pub fn assemble(response: &ValidatedResponse, corpus: &Corpus) -> Persona {
    assemble_on(response, corpus, Local::now().date_naive())
}

/// Assemble a persona with an explicit analysis date.
pub fn assemble_on(response: &ValidatedResponse, corpus: &Corpus, date: NaiveDate) -> Persona {
    let unknown = ValidatedCharacteristic::unknown();

    let characteristics: BTreeMap<CharacteristicSlot, Characteristic> = CharacteristicSlot::ALL
        .into_iter()
        .map(|slot| {
            let validated = response.get(slot).unwrap_or(&unknown);
            let characteristic = Characteristic {
                value: validated.value.clone(),
                reasoning: validated.reasoning.clone(),
                citations: evidence::match_all(&validated.evidence, corpus),
            };
            (slot, characteristic)
        })
        .collect();

    let metadata = PersonaMetadata {
        username: corpus.username().to_string(),
        analysis_date: date.format("%Y-%m-%d").to_string(),
        total_posts: corpus.total_posts(),
        total_comments: corpus.total_comments(),
        account_age_days: corpus.account_age_whole_days(),
        karma: corpus.total_karma(),
    };

    let persona = Persona::new(characteristics, metadata);
    let (verified, unverifiable) = persona.citation_tally();
    log::info!(
        "Assembled persona for u/{}: {} citations verified, {} unverifiable",
        persona.username(),
        verified,
        unverifiable,
    );
    persona
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{aggregate_at, AccountMeta, RawComment, RawPost, SourceKind, UserContent};
    use crate::inference::{validate, UntrustedResponse, UNKNOWN_VALUE};

    fn corpus() -> Corpus {
        aggregate_at(
            UserContent {
                username: "ferris".to_string(),
                posts: vec![RawPost {
                    title: "Learning Rust".to_string(),
                    content: "I started using Rust last week and love the compiler errors."
                        .to_string(),
                    url: "https://reddit.com/r/rust/comments/abc/".to_string(),
                    subreddit: "rust".to_string(),
                    score: 10,
                    created_utc: 1000.0,
                    upvote_ratio: None,
                    num_comments: None,
                }],
                comments: vec![RawComment {
                    content: "I work as a backend developer in Berlin.".to_string(),
                    url: "https://reddit.com/r/cscareerquestions/comments/def/x/ghi/".to_string(),
                    subreddit: "cscareerquestions".to_string(),
                    score: 4,
                    created_utc: 2000.0,
                    parent_id: Some("t3_def".to_string()),
                }],
                account: AccountMeta {
                    created_utc: 0.0,
                    comment_karma: 90,
                    link_karma: 10,
                },
            },
            86_400.0 * 400.7,
        )
        .unwrap()
    }

    fn full_response() -> ValidatedResponse {
        let mut map = serde_json::Map::new();
        for slot in CharacteristicSlot::ALL {
            map.insert(
                slot.key().to_string(),
                serde_json::json!({ "value": format!("{} value", slot.key()), "evidence": [] }),
            );
        }
        map.insert(
            "occupation".to_string(),
            serde_json::json!({
                "value": "Backend developer",
                "evidence": ["backend developer", "made up quote", "backend developer"]
            }),
        );
        validate(&UntrustedResponse::new(serde_json::Value::Object(map).to_string())).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_persona_has_one_characteristic_per_slot() {
        let persona = assemble_on(&full_response(), &corpus(), date());
        assert_eq!(persona.len(), CharacteristicSlot::COUNT);
        for slot in CharacteristicSlot::ALL {
            assert!(persona.characteristic(slot).is_some());
        }
    }

    #[test]
    fn test_metadata_comes_from_corpus() {
        let persona = assemble_on(&full_response(), &corpus(), date());
        let meta = persona.metadata();
        assert_eq!(meta.username, "ferris");
        assert_eq!(meta.analysis_date, "2024-03-09");
        assert_eq!(meta.total_posts, 1);
        assert_eq!(meta.total_comments, 1);
        assert_eq!(meta.account_age_days, 400);
        assert_eq!(meta.karma, 100);
    }

    #[test]
    fn test_citations_keep_order_and_duplicates() {
        let persona = assemble_on(&full_response(), &corpus(), date());
        let occupation = persona.characteristic(CharacteristicSlot::Occupation).unwrap();
        assert_eq!(occupation.value, "Backend developer");
        let kinds: Vec<SourceKind> = occupation.citations.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![SourceKind::Comment, SourceKind::Unknown, SourceKind::Comment]
        );
        assert_eq!(occupation.verified_citations().count(), 2);
        assert_eq!(persona.citation_tally(), (2, 1));
    }

    #[test]
    fn test_absent_slot_becomes_unknown() {
        let response = validate(&UntrustedResponse::new(
            r#"{"estimated_age": {"value": "25-30", "evidence": ["last week"]}}"#,
        ))
        .unwrap();
        let persona = assemble_on(&response, &corpus(), date());
        assert_eq!(persona.len(), CharacteristicSlot::COUNT);
        assert_eq!(persona.value(CharacteristicSlot::Location), UNKNOWN_VALUE);
        assert!(persona
            .characteristic(CharacteristicSlot::Location)
            .unwrap()
            .citations
            .is_empty());
        let age = persona.characteristic(CharacteristicSlot::EstimatedAge).unwrap();
        assert_eq!(age.citations[0].kind, SourceKind::Post);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let response = full_response();
        let c = corpus();
        assert_eq!(assemble_on(&response, &c, date()), assemble_on(&response, &c, date()));
    }

    #[test]
    fn test_summary_and_json_export() {
        let persona = assemble_on(&full_response(), &corpus(), date());
        let summary = persona.summary_lines();
        assert_eq!(summary[1], "Occupation: Backend developer");
        let json = persona.to_json().unwrap();
        assert!(json.contains("\"occupation\""));
        assert!(json.contains("\"kind\": \"comment\""));
        let back: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(back, persona);
    }
}
