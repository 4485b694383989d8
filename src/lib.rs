//! # persona-forge
//!
//! Evidence-grounded user personas from public Reddit activity.
//!
//! The pipeline aggregates a user's posts and comments into a [`Corpus`],
//! asks a generative backend to fill a fixed sixteen-slot characteristic
//! schema, validates the untrusted answer, and grounds every evidence quote
//! the backend claims in the exact post or comment that contains it. Quotes
//! that cannot be found become explicit unverifiable citations rather than
//! being dropped.
//!
//! ```ignore
//! use persona_forge::{PersonaConfig, PersonaGenerator};
//!
//! let config = PersonaConfig::from_env()?;
//! let generator = PersonaGenerator::from_config(&config)?;
//! let persona = generator.generate_persona("https://www.reddit.com/user/spez/", 100)?;
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod evidence;
pub mod inference;
pub mod persona;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod sources;

pub use config::{InferenceConfig, PersonaConfig, PipelineConfig, RedditConfig};
pub use corpus::{Corpus, SourceItem, SourceKind, UserContent};
pub use error::{PersonaError, Result};
pub use evidence::Citation;
pub use inference::{InferenceBackend, UntrustedResponse, ValidatedResponse};
pub use persona::{Characteristic, Persona, PersonaMetadata};
pub use pipeline::{generate_persona, PersonaGenerator};
pub use report::{FileSink, PersonaSink};
pub use schema::CharacteristicSlot;
pub use sources::ContentSource;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
