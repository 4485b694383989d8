//! The end-to-end persona pipeline.
//!
//! identifier → fetch → aggregate → build request → infer → validate →
//! match evidence → assemble. Each stage fails fast; there is no retry here.
//! Callers that want retries re-run [`PersonaGenerator::generate_persona`]
//! as a whole.

use crate::config::{PersonaConfig, PipelineConfig};
use crate::corpus::{self, Corpus};
use crate::error::{PersonaError, Result};
use crate::inference::{self, GeminiBackend, InferenceBackend, RequestOptions};
use crate::persona::{self, Persona};
use crate::sources::{self, ContentSource, RedditSource};

/// Runs the pipeline against one content source and one inference backend.
#[derive(Debug)]
pub struct PersonaGenerator {
    source: Box<dyn ContentSource>,
    backend: Box<dyn InferenceBackend>,
    options: RequestOptions,
}

impl PersonaGenerator {
    pub fn new(source: Box<dyn ContentSource>, backend: Box<dyn InferenceBackend>) -> Self {
        Self {
            source,
            backend,
            options: RequestOptions::default(),
        }
    }

    /// Build the Reddit + Gemini generator from explicit configuration.
    pub fn from_config(config: &PersonaConfig) -> Result<Self> {
        config.validate()?;
        let source = RedditSource::new(config.reddit.clone())?;
        let backend = GeminiBackend::new(config.inference.clone())?;
        Ok(Self::new(Box::new(source), Box::new(backend)).with_pipeline_config(&config.pipeline))
    }

    pub fn with_request_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_pipeline_config(self, pipeline: &PipelineConfig) -> Self {
        self.with_request_options(RequestOptions {
            post_char_budget: pipeline.post_char_budget,
            comment_char_budget: pipeline.comment_char_budget,
        })
    }

    /// Generate a persona for a profile URL or username.
    ///
    /// `limit` caps posts and comments separately and must be positive.
    pub fn generate_persona(&self, profile_identifier: &str, limit: usize) -> Result<Persona> {
        if limit == 0 {
            return Err(PersonaError::config("limit must be positive"));
        }
        let username = sources::extract_username(profile_identifier)?;
        log::info!("Analyzing user: u/{}", username);

        let corpus = self.collect_corpus(&username, limit)?;
        self.persona_from_corpus(&corpus)
    }

    /// Fetch and aggregate a user's content.
    pub fn collect_corpus(&self, username: &str, limit: usize) -> Result<Corpus> {
        let content = self.source.fetch_user_content(username, limit)?;
        corpus::aggregate(content)
    }

    /// Run inference, validation and assembly over an existing corpus.
    pub fn persona_from_corpus(&self, corpus: &Corpus) -> Result<Persona> {
        let prompt = inference::build_request(corpus, &self.options);

        log::info!(
            "Analyzing u/{} with {} ({} prompt chars)",
            corpus.username(),
            self.backend.name(),
            prompt.chars().count()
        );
        let raw = self.backend.infer(&prompt)?;

        let validated = inference::validate(&raw)?;
        if !validated.missing_slots().is_empty() {
            log::warn!(
                "Inference response omitted {} slot(s): {:?}",
                validated.missing_slots().len(),
                validated.missing_slots()
            );
        }

        Ok(persona::assemble(&validated, corpus))
    }
}

/// One-shot convenience: build a generator from `config` and run it.
pub fn generate_persona(
    config: &PersonaConfig,
    profile_identifier: &str,
    limit: usize,
) -> Result<Persona> {
    PersonaGenerator::from_config(config)?.generate_persona(profile_identifier, limit)
}
