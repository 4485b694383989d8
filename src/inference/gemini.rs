//! Google Gemini inference backend.
//!
//! Calls the `generateContent` REST endpoint with a single user turn and
//! returns the concatenated text parts as an [`UntrustedResponse`].
//!
//! The call is blocking: the async `reqwest` client is driven on a private
//! current-thread runtime, so [`GeminiBackend::infer`] must not be invoked
//! from inside another tokio runtime. There is no retry loop; the configured
//! timeout is the only cancellation mechanism and any failure aborts the run.

use std::time::Duration;

use serde_json::Value;

use super::{InferenceBackend, UntrustedResponse};
use crate::config::InferenceConfig;
use crate::error::{PersonaError, Result};

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: InferenceConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a backend from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Config`] for a missing API key and
    /// [`PersonaError::Inference`] if the HTTP client cannot be built.
    pub fn new(config: InferenceConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PersonaError::inference(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build generation config for the Gemini API.
    fn generation_config(&self) -> Value {
        let mut config = serde_json::Map::new();
        if let Some(temp) = self.config.temperature {
            config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = self.config.max_output_tokens {
            config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        Value::Object(config)
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": self.generation_config(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<UntrustedResponse> {
        let body = self.build_request_body(prompt);

        let response = self
            .client
            .post(self.api_endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", self.config.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PersonaError::inference(format!(
                        "Gemini request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    PersonaError::inference(format!("Gemini request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            PersonaError::inference(format!(
                "failed to read Gemini response: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            return Err(PersonaError::inference(format!(
                "Gemini API error ({}): {}",
                status,
                truncate(&response_text, 500)
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            PersonaError::inference(format!(
                "Failed to parse Gemini response: {} - Body: {}",
                e,
                truncate(&response_text, 500)
            ))
        })?;

        if let Some(usage) = response_json.get("usageMetadata") {
            log::debug!("Gemini usage: {}", usage);
        }

        parse_response(&response_json).map(UntrustedResponse::new)
    }
}

impl InferenceBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn infer(&self, prompt: &str) -> Result<UntrustedResponse> {
        log::debug!(
            "GeminiBackend.infer: model={}, prompt_chars={}",
            self.config.model,
            prompt.chars().count(),
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PersonaError::inference(format!("failed to start runtime: {}", e)))?;
        rt.block_on(self.generate(prompt))
    }
}

/// Extract the text of the first candidate.
fn parse_response(response: &Value) -> Result<String> {
    if let Some(error) = response.get("error") {
        let msg = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown Gemini API error");
        return Err(PersonaError::inference(format!("Gemini API error: {}", msg)));
    }

    let candidate = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| PersonaError::inference("No candidates in Gemini response"))?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            let reason = candidate
                .get("finishReason")
                .and_then(|r| r.as_str())
                .unwrap_or("unknown");
            PersonaError::inference(format!(
                "No content.parts in Gemini response (finishReason: {})",
                reason
            ))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(PersonaError::inference("Gemini returned an empty response"));
    }
    Ok(text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
