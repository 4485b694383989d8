//! Profile identifier parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PersonaError, Result};

static PROFILE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"reddit\.com/(?:u|user)/([^/?#\s]+)").unwrap());
static PREFIXED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/?u/([A-Za-z0-9_-]{3,20})/?$").unwrap());
static BARE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap());

/// Extract a username from a profile URL (`https://www.reddit.com/user/name/`,
/// `reddit.com/u/name`), a prefixed name (`u/name`) or a bare username.
pub fn extract_username(identifier: &str) -> Result<String> {
    let trimmed = identifier.trim();

    if let Some(caps) = PROFILE_URL.captures(trimmed) {
        let name = &caps[1];
        if BARE_NAME.is_match(name) {
            return Ok(name.to_string());
        }
        return Err(PersonaError::IdentifierExtraction {
            identifier: identifier.to_string(),
        });
    }
    if let Some(caps) = PREFIXED_NAME.captures(trimmed) {
        return Ok(caps[1].to_string());
    }
    if BARE_NAME.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(PersonaError::IdentifierExtraction {
        identifier: identifier.to_string(),
    })
}
