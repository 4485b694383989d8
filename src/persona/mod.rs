//! The persona entity.
//!
//! A [`Persona`] holds one [`Characteristic`] per schema slot plus metadata
//! derived from the corpus. It is produced once per pipeline run by
//! [`assembler::assemble`] and is immutable afterwards.

pub mod assembler;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evidence::Citation;
use crate::schema::CharacteristicSlot;

pub use assembler::{assemble, assemble_on};

/// One facet of a persona with its supporting citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub citations: Vec<Citation>,
}

impl Characteristic {
    pub fn verified_citations(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter().filter(|c| c.is_verified())
    }
}

/// Run-level metadata attached to a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaMetadata {
    pub username: String,
    /// `YYYY-MM-DD`.
    pub analysis_date: String,
    pub total_posts: usize,
    pub total_comments: usize,
    pub account_age_days: i64,
    pub karma: i64,
}

/// A complete persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    characteristics: BTreeMap<CharacteristicSlot, Characteristic>,
    metadata: PersonaMetadata,
}

impl Persona {
    pub(crate) fn new(
        characteristics: BTreeMap<CharacteristicSlot, Characteristic>,
        metadata: PersonaMetadata,
    ) -> Self {
        Self {
            characteristics,
            metadata,
        }
    }

    pub fn metadata(&self) -> &PersonaMetadata {
        &self.metadata
    }

    pub fn username(&self) -> &str {
        &self.metadata.username
    }

    pub fn characteristic(&self, slot: CharacteristicSlot) -> Option<&Characteristic> {
        self.characteristics.get(&slot)
    }

    /// Shorthand for a slot's value, `"Unknown"` if absent.
    pub fn value(&self, slot: CharacteristicSlot) -> &str {
        self.characteristics
            .get(&slot)
            .map(|c| c.value.as_str())
            .unwrap_or(crate::inference::UNKNOWN_VALUE)
    }

    /// Characteristics in schema order.
    pub fn characteristics(&self) -> impl Iterator<Item = (CharacteristicSlot, &Characteristic)> {
        self.characteristics.iter().map(|(slot, c)| (*slot, c))
    }

    pub fn len(&self) -> usize {
        self.characteristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty()
    }

    /// `(verified, unverifiable)` citation counts across all slots.
    pub fn citation_tally(&self) -> (usize, usize) {
        self.characteristics
            .values()
            .flat_map(|c| c.citations.iter())
            .fold((0, 0), |(ok, bad), c| {
                if c.is_verified() {
                    (ok + 1, bad)
                } else {
                    (ok, bad + 1)
                }
            })
    }

    /// Short human-readable summary used after a CLI run.
    pub fn summary_lines(&self) -> Vec<String> {
        [
            ("Age", CharacteristicSlot::EstimatedAge),
            ("Occupation", CharacteristicSlot::Occupation),
            ("Location", CharacteristicSlot::Location),
            ("Interests", CharacteristicSlot::Interests),
            ("Quote", CharacteristicSlot::RepresentativeQuote),
        ]
        .into_iter()
        .map(|(label, slot)| format!("{}: {}", label, self.value(slot)))
        .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
