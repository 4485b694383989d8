//! Inference response validation.
//!
//! Turns an [`UntrustedResponse`] into a [`ValidatedResponse`]. The parser is
//! tolerant of the formatting noise generative backends add (a fenced code
//! wrapper, odd value types) but strict about the whole-response shape:
//! unparsable text or a response with none of the schema slots is fatal,
//! whereas a single missing or mangled slot degrades to `"Unknown"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::UntrustedResponse;
use crate::error::{PersonaError, Result};
use crate::schema::CharacteristicSlot;

/// Value used when a slot is missing or has no usable value.
pub const UNKNOWN_VALUE: &str = "Unknown";

const FENCE: &str = "```";

/// One slot of a validated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCharacteristic {
    pub value: String,
    pub reasoning: Option<String>,
    /// Evidence quotes exactly as the backend claimed them, in order.
    pub evidence: Vec<String>,
}

impl ValidatedCharacteristic {
    pub fn unknown() -> Self {
        Self {
            value: UNKNOWN_VALUE.to_string(),
            reasoning: None,
            evidence: Vec::new(),
        }
    }
}

/// Schema-conformant mapping from slot to its validated record.
///
/// Always holds an entry for every slot; slots that the backend omitted are
/// listed in [`ValidatedResponse::missing_slots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedResponse {
    characteristics: BTreeMap<CharacteristicSlot, ValidatedCharacteristic>,
    missing: Vec<CharacteristicSlot>,
}

impl ValidatedResponse {
    pub fn get(&self, slot: CharacteristicSlot) -> Option<&ValidatedCharacteristic> {
        self.characteristics.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacteristicSlot, &ValidatedCharacteristic)> {
        self.characteristics.iter().map(|(slot, c)| (*slot, c))
    }

    /// Slots absent (or unusable) in the raw response.
    pub fn missing_slots(&self) -> &[CharacteristicSlot] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.characteristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty()
    }
}

/// Validate raw backend text against the characteristic schema.
///
/// # Errors
///
/// * [`PersonaError::MalformedResponse`] when the text (after fence
///   stripping) is not a JSON object.
/// * [`PersonaError::SchemaMismatch`] when none of the slot keys is present.
pub fn validate(response: &UntrustedResponse) -> Result<ValidatedResponse> {
    let body = strip_code_fence(response.as_str());

    let parsed: Value = serde_json::from_str(body).map_err(|e| {
        log::warn!(
            "Inference response is not valid JSON: {} (starts with {:?})",
            e,
            response.preview(200)
        );
        PersonaError::MalformedResponse {
            message: format!("JSON parse error: {}", e),
        }
    })?;

    let object = match parsed {
        Value::Object(map) => map,
        other => {
            return Err(PersonaError::MalformedResponse {
                message: format!("expected a JSON object, got {}", json_type_name(&other)),
            })
        }
    };

    if !CharacteristicSlot::ALL
        .iter()
        .any(|slot| object.contains_key(slot.key()))
    {
        return Err(PersonaError::SchemaMismatch {
            message: format!(
                "none of the {} characteristic keys are present",
                CharacteristicSlot::COUNT
            ),
        });
    }

    for key in object.keys() {
        if CharacteristicSlot::from_key(key).is_none() {
            log::debug!("Ignoring unexpected key in inference response: {}", key);
        }
    }

    let mut characteristics = BTreeMap::new();
    let mut missing = Vec::new();

    for slot in CharacteristicSlot::ALL {
        let record = match object.get(slot.key()) {
            Some(Value::Object(fields)) => validate_slot(fields),
            Some(other) => {
                log::warn!(
                    "Slot {} is a {} instead of an object; treating as Unknown",
                    slot,
                    json_type_name(other)
                );
                missing.push(slot);
                ValidatedCharacteristic::unknown()
            }
            None => {
                log::debug!("Slot {} missing from inference response", slot);
                missing.push(slot);
                ValidatedCharacteristic::unknown()
            }
        };
        characteristics.insert(slot, record);
    }

    Ok(ValidatedResponse {
        characteristics,
        missing,
    })
}

/// Remove one leading fence marker (with or without a language tag) and one
/// trailing fence marker.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        // Drop the language tag, if any, up to the end of the opening line.
        body = match rest.find('\n') {
            Some(newline) if is_language_tag(&rest[..newline]) => &rest[newline + 1..],
            None if is_language_tag(rest) => "",
            _ => rest,
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest;
    }

    body.trim()
}

fn is_language_tag(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}

fn validate_slot(fields: &Map<String, Value>) -> ValidatedCharacteristic {
    let value = fields
        .get("value")
        .and_then(coerce_value)
        .unwrap_or_else(|| UNKNOWN_VALUE.to_string());

    let reasoning = fields
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let evidence = match fields.get("evidence") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|quote| !quote.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(quote)) if !quote.trim().is_empty() => vec![quote.clone()],
        _ => Vec::new(),
    };

    ValidatedCharacteristic {
        value,
        reasoning,
        evidence,
    }
}

fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response() -> String {
        let mut map = Map::new();
        for slot in CharacteristicSlot::ALL {
            map.insert(
                slot.key().to_string(),
                serde_json::json!({
                    "value": format!("{} value", slot.key()),
                    "reasoning": "because",
                    "evidence": [format!("quote for {}", slot.key())],
                }),
            );
        }
        Value::Object(map).to_string()
    }

    #[test]
    fn test_strip_fence_with_language_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
    }

    #[test]
    fn test_strip_fence_on_single_line() {
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_unfenced_text_is_untouched() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_response_with_language_tag_parses() {
        let raw = format!("```json\n{}\n```", full_response());
        let validated = validate(&UntrustedResponse::new(raw)).unwrap();
        assert_eq!(validated.len(), CharacteristicSlot::COUNT);
        assert!(validated.missing_slots().is_empty());
        let occupation = validated.get(CharacteristicSlot::Occupation).unwrap();
        assert_eq!(occupation.value, "occupation value");
        assert_eq!(occupation.reasoning.as_deref(), Some("because"));
        assert_eq!(occupation.evidence, vec!["quote for occupation".to_string()]);
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = validate(&UntrustedResponse::new("Sorry, I can't help with that.")).unwrap_err();
        assert!(matches!(err, PersonaError::MalformedResponse { .. }));
    }

    #[test]
    fn test_json_array_is_malformed() {
        let err = validate(&UntrustedResponse::new("[1, 2, 3]")).unwrap_err();
        assert!(matches!(err, PersonaError::MalformedResponse { .. }));
    }

    #[test]
    fn test_no_schema_keys_is_schema_mismatch() {
        let err = validate(&UntrustedResponse::new(r#"{"summary": "nice person"}"#)).unwrap_err();
        assert!(matches!(err, PersonaError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_single_missing_slot_degrades_to_unknown() {
        let raw = r#"{"occupation": {"value": "Engineer", "evidence": ["I write code"]}}"#;
        let validated = validate(&UntrustedResponse::new(raw)).unwrap();
        assert_eq!(validated.len(), CharacteristicSlot::COUNT);
        assert_eq!(validated.missing_slots().len(), CharacteristicSlot::COUNT - 1);
        let location = validated.get(CharacteristicSlot::Location).unwrap();
        assert_eq!(location, &ValidatedCharacteristic::unknown());
    }

    #[test]
    fn test_missing_evidence_defaults_to_empty() {
        let raw = r#"{"goals": {"value": "Ship a crate"}}"#;
        let validated = validate(&UntrustedResponse::new(raw)).unwrap();
        let goals = validated.get(CharacteristicSlot::Goals).unwrap();
        assert_eq!(goals.value, "Ship a crate");
        assert!(goals.evidence.is_empty());
    }

    #[test]
    fn test_value_coercion() {
        let raw = r#"{
            "estimated_age": {"value": 27},
            "interests": {"value": ["rust", "climbing"]},
            "location": {"value": "   "},
            "values": {"value": null},
            "goals": "not an object"
        }"#;
        let validated = validate(&UntrustedResponse::new(raw)).unwrap();
        assert_eq!(validated.get(CharacteristicSlot::EstimatedAge).unwrap().value, "27");
        assert_eq!(
            validated.get(CharacteristicSlot::Interests).unwrap().value,
            "rust, climbing"
        );
        assert_eq!(validated.get(CharacteristicSlot::Location).unwrap().value, UNKNOWN_VALUE);
        assert_eq!(validated.get(CharacteristicSlot::Values).unwrap().value, UNKNOWN_VALUE);
        assert!(validated.missing_slots().contains(&CharacteristicSlot::Goals));
    }

    #[test]
    fn test_evidence_coercion() {
        let raw = r#"{
            "occupation": {"value": "Dev", "evidence": ["a", "", 42, "b", "a"]},
            "location": {"value": "Oslo", "evidence": "I live in Oslo"}
        }"#;
        let validated = validate(&UntrustedResponse::new(raw)).unwrap();
        assert_eq!(
            validated.get(CharacteristicSlot::Occupation).unwrap().evidence,
            vec!["a".to_string(), "b".to_string(), "a".to_string()]
        );
        assert_eq!(
            validated.get(CharacteristicSlot::Location).unwrap().evidence,
            vec!["I live in Oslo".to_string()]
        );
    }
}
