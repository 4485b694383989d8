//! Error types for the persona pipeline.
//!
//! Every pipeline stage fails fast with one of these variants. Per-slot
//! problems (a missing characteristic, an unverifiable quote) are not errors:
//! they degrade to `"Unknown"` values and sentinel citations instead.

use thiserror::Error;

/// Errors surfaced by a persona pipeline run.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// The profile identifier could not be turned into a username.
    #[error("Could not extract username from profile identifier: {identifier}")]
    IdentifierExtraction { identifier: String },

    /// The content source failed or returned nothing usable.
    #[error("Failed to fetch user content: {message}")]
    Fetch { message: String },

    /// The user has neither posts nor comments.
    #[error("User {username} has no posts or comments to analyze")]
    EmptyCorpus { username: String },

    /// The inference backend call failed or timed out.
    #[error("Inference backend error: {message}")]
    Inference { message: String },

    /// The backend response is not well-formed structured data.
    #[error("Malformed inference response: {message}")]
    MalformedResponse { message: String },

    /// The backend response contains none of the characteristic slots.
    #[error("Inference response does not match the characteristic schema: {message}")]
    SchemaMismatch { message: String },

    /// Collaborator configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Report persistence failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PersonaError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PersonaError>;
