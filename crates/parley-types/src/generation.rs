//! Generation endpoint request/response types for Parley.
//!
//! These types model the JSON payload exchanged with the generation server:
//! `POST /v1/generate` with a [`GenerateRequest`] body, answered by a
//! [`GenerateResponse`].

use serde::{Deserialize, Serialize};

/// Placeholder in the system prompt that receives the chat title.
pub const CONTEXT_PLACEHOLDER: &str = "%s";

/// Per-bot generation settings, loaded from `<settings_dir>/<bot><order>.json`.
///
/// Missing fields fall back to their zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// System prompt with exactly one [`CONTEXT_PLACEHOLDER`] for the chat title.
    pub system_prompt: String,
    pub chain_prompts: Vec<String>,
    pub rate_prompt: String,

    pub temperature: f32,
    pub repetition_penalty: f32,
    pub top_p: f32,
    pub top_k: i64,

    pub response_tokens: i64,
    pub response_token_shift: i64,
    pub response_batch_size: i64,

    pub rate_tokens: i64,
    pub rate_batch_size: i64,
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Chronologically ordered dialog lines, oldest first.
    pub dialog: Vec<String>,
    pub settings: Settings,
}

/// Body of a successful generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Errors from a generation request.
///
/// `Settings` and `Placeholder` are configuration errors and are never
/// retried. The remaining variants are transient and retried with backoff.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to load settings from {path}: {message}")]
    Settings { path: String, message: String },

    #[error("system prompt must contain exactly one '%s' for the chat title, found {found}")]
    Placeholder { found: usize },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl GenerationError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::Transport(_)
                | GenerationError::Status { .. }
                | GenerationError::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialize_full() {
        let json = r#"{
            "system_prompt": "You chat in %s.",
            "chain_prompts": ["Be brief."],
            "rate_prompt": "Rate it.",
            "temperature": 0.7,
            "repetition_penalty": 1.1,
            "top_p": 0.9,
            "top_k": 40,
            "response_tokens": 128,
            "response_token_shift": 16,
            "response_batch_size": 4,
            "rate_tokens": 8,
            "rate_batch_size": 2
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.system_prompt, "You chat in %s.");
        assert_eq!(settings.chain_prompts, vec!["Be brief."]);
        assert_eq!(settings.top_k, 40);
        assert_eq!(settings.rate_batch_size, 2);
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_missing_fields_default_to_zero() {
        let settings: Settings = serde_json::from_str(r#"{"system_prompt": "%s"}"#).unwrap();
        assert!(settings.chain_prompts.is_empty());
        assert_eq!(settings.response_tokens, 0);
        assert_eq!(settings.top_p, 0.0);
    }

    #[test]
    fn test_settings_accept_values_beyond_32_bits() {
        let settings: Settings =
            serde_json::from_str(r#"{"response_tokens": 4294967296, "rate_tokens": -4294967296}"#)
                .unwrap();
        assert_eq!(settings.response_tokens, 4_294_967_296);
        assert_eq!(settings.rate_tokens, -4_294_967_296);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateRequest {
            dialog: vec!["Alice: hello".to_string()],
            settings: Settings::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dialog"][0], "Alice: hello");
        assert!(json["settings"]["repetition_penalty"].is_number());
        assert!(json["settings"]["chain_prompts"].is_array());
    }

    #[test]
    fn test_error_transience() {
        assert!(GenerationError::Transport("refused".into()).is_transient());
        assert!(
            GenerationError::Status {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!GenerationError::Placeholder { found: 0 }.is_transient());
        assert!(
            !GenerationError::Settings {
                path: "x.json".into(),
                message: "missing".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_placeholder_error_display() {
        let err = GenerationError::Placeholder { found: 2 };
        assert!(err.to_string().contains("found 2"));
    }
}
