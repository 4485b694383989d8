//! Inference boundary: request construction, the backend seam, and response
//! validation.
//!
//! The backend is a black box that turns a prompt into text. Its output is
//! wrapped in [`UntrustedResponse`] and must pass through
//! [`validator::validate`] before anything downstream can use it.

pub mod gemini;
pub mod request;
pub mod validator;

use std::fmt;

use crate::error::Result;

pub use gemini::GeminiBackend;
pub use request::{build_request, RequestOptions, EXCERPT_CHAR_BUDGET};
pub use validator::{validate, ValidatedCharacteristic, ValidatedResponse, UNKNOWN_VALUE};

/// Raw text returned by an inference backend.
///
/// Nothing in the crate deserializes this directly; the only way to turn it
/// into trusted data is [`validator::validate`].
#[derive(Clone, PartialEq, Eq)]
pub struct UntrustedResponse(String);

impl UntrustedResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters for diagnostics.
    pub fn preview(&self, max_chars: usize) -> String {
        self.0.chars().take(max_chars).collect()
    }
}

impl fmt::Debug for UntrustedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UntrustedResponse")
            .field(&self.preview(80))
            .finish()
    }
}

/// A generative backend: prompt text in, untrusted text out.
///
/// The call is blocking. Implementations enforce their own configured
/// timeout and report failures as
/// [`PersonaError::Inference`](crate::error::PersonaError::Inference);
/// they do not retry.
pub trait InferenceBackend: Send + Sync + fmt::Debug {
    /// Backend name for logging.
    fn name(&self) -> &str;

    fn infer(&self, prompt: &str) -> Result<UntrustedResponse>;
}
