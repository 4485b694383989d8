//! The fixed characteristic schema.
//!
//! A persona always has exactly the sixteen slots enumerated by
//! [`CharacteristicSlot`]. Every slot has the same record shape (a textual
//! value plus an evidence list), so validation and assembly treat them
//! uniformly by iterating [`CharacteristicSlot::ALL`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Report section a slot is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSection {
    Overview,
    Demographics,
    PersonalityAndValues,
    BehavioralPatterns,
    MotivationsAndGoals,
    TechnicalProfile,
}

impl SlotSection {
    /// Sections in report order.
    pub const ALL: [SlotSection; 6] = [
        Self::Overview,
        Self::Demographics,
        Self::PersonalityAndValues,
        Self::BehavioralPatterns,
        Self::MotivationsAndGoals,
        Self::TechnicalProfile,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "PERSONA OVERVIEW",
            Self::Demographics => "DEMOGRAPHICS",
            Self::PersonalityAndValues => "PERSONALITY & VALUES",
            Self::BehavioralPatterns => "BEHAVIORAL PATTERNS",
            Self::MotivationsAndGoals => "MOTIVATIONS & GOALS",
            Self::TechnicalProfile => "TECHNICAL PROFILE",
        }
    }

    /// Slots rendered under this section, in schema order.
    pub fn slots(&self) -> impl Iterator<Item = CharacteristicSlot> + '_ {
        CharacteristicSlot::ALL
            .into_iter()
            .filter(move |slot| slot.section() == *self)
    }
}

/// One named facet of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicSlot {
    EstimatedAge,
    Occupation,
    Location,
    RelationshipStatus,
    PersonalityType,
    Interests,
    Values,
    CommunicationStyle,
    OnlineBehavior,
    ActivityPatterns,
    PrimaryMotivations,
    Frustrations,
    Goals,
    TechSavviness,
    PreferredPlatforms,
    RepresentativeQuote,
}

impl CharacteristicSlot {
    /// Number of slots in the schema.
    pub const COUNT: usize = 16;

    /// All slots in schema order.
    pub const ALL: [CharacteristicSlot; Self::COUNT] = [
        Self::EstimatedAge,
        Self::Occupation,
        Self::Location,
        Self::RelationshipStatus,
        Self::PersonalityType,
        Self::Interests,
        Self::Values,
        Self::CommunicationStyle,
        Self::OnlineBehavior,
        Self::ActivityPatterns,
        Self::PrimaryMotivations,
        Self::Frustrations,
        Self::Goals,
        Self::TechSavviness,
        Self::PreferredPlatforms,
        Self::RepresentativeQuote,
    ];

    /// The key used in inference requests and responses.
    pub fn key(&self) -> &'static str {
        match self {
            Self::EstimatedAge => "estimated_age",
            Self::Occupation => "occupation",
            Self::Location => "location",
            Self::RelationshipStatus => "relationship_status",
            Self::PersonalityType => "personality_type",
            Self::Interests => "interests",
            Self::Values => "values",
            Self::CommunicationStyle => "communication_style",
            Self::OnlineBehavior => "online_behavior",
            Self::ActivityPatterns => "activity_patterns",
            Self::PrimaryMotivations => "primary_motivations",
            Self::Frustrations => "frustrations",
            Self::Goals => "goals",
            Self::TechSavviness => "tech_savviness",
            Self::PreferredPlatforms => "preferred_platforms",
            Self::RepresentativeQuote => "representative_quote",
        }
    }

    /// Look up a slot by its response key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    /// Human-readable label, e.g. `"Estimated Age"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EstimatedAge => "Estimated Age",
            Self::Occupation => "Occupation",
            Self::Location => "Location",
            Self::RelationshipStatus => "Relationship Status",
            Self::PersonalityType => "Personality Type",
            Self::Interests => "Interests",
            Self::Values => "Values",
            Self::CommunicationStyle => "Communication Style",
            Self::OnlineBehavior => "Online Behavior",
            Self::ActivityPatterns => "Activity Patterns",
            Self::PrimaryMotivations => "Primary Motivations",
            Self::Frustrations => "Frustrations",
            Self::Goals => "Goals",
            Self::TechSavviness => "Tech Savviness",
            Self::PreferredPlatforms => "Preferred Platforms",
            Self::RepresentativeQuote => "Representative Quote",
        }
    }

    pub fn section(&self) -> SlotSection {
        match self {
            Self::RepresentativeQuote => SlotSection::Overview,
            Self::EstimatedAge | Self::Occupation | Self::Location | Self::RelationshipStatus => {
                SlotSection::Demographics
            }
            Self::PersonalityType | Self::Interests | Self::Values => {
                SlotSection::PersonalityAndValues
            }
            Self::CommunicationStyle | Self::OnlineBehavior | Self::ActivityPatterns => {
                SlotSection::BehavioralPatterns
            }
            Self::PrimaryMotivations | Self::Frustrations | Self::Goals => {
                SlotSection::MotivationsAndGoals
            }
            Self::TechSavviness | Self::PreferredPlatforms => SlotSection::TechnicalProfile,
        }
    }

    /// Instruction text for the `value` field of this slot.
    pub fn value_hint(&self) -> &'static str {
        match self {
            Self::EstimatedAge => "Age range or specific age based on content",
            Self::Occupation => "Job title or field or 'Unknown' if not clear",
            Self::Location => "City, Country or region or 'Unknown' if not mentioned",
            Self::RelationshipStatus => "Single/Married/In a relationship/Unknown",
            Self::PersonalityType => "Personality traits and type description",
            Self::Interests => "List of main interests and hobbies",
            Self::Values => "Core values and beliefs",
            Self::CommunicationStyle => "How they communicate online",
            Self::OnlineBehavior => "Online behavior patterns",
            Self::ActivityPatterns => "When and how they use Reddit",
            Self::PrimaryMotivations => "What drives them",
            Self::Frustrations => "Common frustrations and pain points",
            Self::Goals => "Apparent goals and aspirations",
            Self::TechSavviness => "Technical skill level assessment",
            Self::PreferredPlatforms => "Preferred platforms and tools",
            Self::RepresentativeQuote => "A quote that best represents their personality",
        }
    }

    /// Instruction text for the `reasoning` field of this slot.
    pub fn reasoning_hint(&self) -> &'static str {
        match self {
            Self::EstimatedAge => "Explanation of how you determined this",
            Self::Occupation => "Explanation based on content analysis",
            Self::PersonalityType => "Explanation based on communication patterns",
            Self::Interests => "Based on subreddit activity and content",
            Self::CommunicationStyle => "Analysis of their writing style",
            Self::OnlineBehavior => "Based on activity patterns",
            Self::ActivityPatterns => "Analysis of posting patterns",
            Self::Frustrations => "Based on complaints and issues mentioned",
            Self::TechSavviness => "Based on technical discussions",
            Self::PreferredPlatforms => "Based on mentions and usage",
            Self::RepresentativeQuote => "Why this quote is representative",
            _ => "Explanation",
        }
    }

    /// Instruction text for the `evidence` list of this slot.
    pub fn evidence_hint(&self) -> &'static str {
        match self {
            Self::EstimatedAge => "Direct quote from post/comment that supports this inference",
            Self::Occupation => "Supporting quotes from posts/comments",
            Self::PersonalityType => "Supporting quotes showing personality",
            Self::RepresentativeQuote => "The actual quote from their content",
            _ => "Supporting quotes",
        }
    }
}

impl fmt::Display for CharacteristicSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
