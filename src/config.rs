//! Configuration for the persona pipeline and its collaborators.
//!
//! Credentials are never read from global state by the library. Callers build
//! a [`PersonaConfig`] (from YAML, from environment variables, or by hand)
//! and hand the relevant section to each collaborator's constructor.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, Result};
use crate::inference::request::EXCERPT_CHAR_BUDGET;

/// Default user agent sent to the Reddit API.
pub const DEFAULT_USER_AGENT: &str = "PersonaGenerator/1.0";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_reddit_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_reddit_auth_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_inference_timeout() -> u64 {
    120
}

fn default_limit() -> usize {
    100
}

fn default_char_budget() -> usize {
    EXCERPT_CHAR_BUDGET
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Reddit API application credentials.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// API host used for authenticated listing requests.
    #[serde(default = "default_reddit_base_url")]
    pub base_url: String,
    /// OAuth token endpoint.
    #[serde(default = "default_reddit_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RedditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .field("auth_url", &self.auth_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RedditConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: default_user_agent(),
            base_url: default_reddit_base_url(),
            auth_url: default_reddit_auth_url(),
            timeout_secs: default_fetch_timeout(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(PersonaError::config(
                "Reddit credentials not provided (client_id and client_secret are required)",
            ));
        }
        Ok(())
    }
}

/// Generative backend settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Upper bound for one inference call; the only cancellation mechanism.
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl InferenceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_inference_timeout(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PersonaError::config("Gemini API key not provided"));
        }
        if self.timeout_secs == 0 {
            return Err(PersonaError::config("inference timeout must be positive"));
        }
        Ok(())
    }
}

/// Pipeline knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum posts and maximum comments fetched per user.
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_char_budget")]
    pub post_char_budget: usize,
    #[serde(default = "default_char_budget")]
    pub comment_char_budget: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            post_char_budget: default_char_budget(),
            comment_char_budget: default_char_budget(),
        }
    }
}

// ---------------------------------------------------------------------------
// PersonaConfig
// ---------------------------------------------------------------------------

/// Complete configuration for one persona generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub reddit: RedditConfig,
    pub inference: InferenceConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl PersonaConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| PersonaError::config(format!("invalid YAML config: {}", e)))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PersonaError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Build from the process environment.
    ///
    /// Reads `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`, `REDDIT_USER_AGENT`,
    /// `GEMINI_API_KEY` (falling back to `GOOGLE_API_KEY`) and `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut reddit = RedditConfig::new(
            non_empty("REDDIT_CLIENT_ID").unwrap_or_default(),
            non_empty("REDDIT_CLIENT_SECRET").unwrap_or_default(),
        );
        if let Some(agent) = non_empty("REDDIT_USER_AGENT") {
            reddit.user_agent = agent;
        }

        let mut inference = InferenceConfig::new(
            non_empty("GEMINI_API_KEY")
                .or_else(|| non_empty("GOOGLE_API_KEY"))
                .unwrap_or_default(),
        );
        if let Some(model) = non_empty("GEMINI_MODEL") {
            inference.model = model;
        }

        let config = Self {
            reddit,
            inference,
            pipeline: PipelineConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.reddit.validate()?;
        self.inference.validate()?;
        if self.pipeline.limit == 0 {
            return Err(PersonaError::config("limit must be positive"));
        }
        Ok(())
    }
}
