//! LLM Client Trait
//!
//! Unified completion interface for the model providers (Gemini, Anthropic).

use async_trait::async_trait;

use crate::error::LlmResult;

/// Connection settings shared by every provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
}

/// Raw completion returned by a provider
///
/// Some providers answer with several text segments instead of one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    Text(String),
    Parts(Vec<String>),
}

impl ModelOutput {
    /// Flatten to a single string, joining segments with a space
    pub fn into_text(self) -> String {
        match self {
            ModelOutput::Text(text) => text,
            ModelOutput::Parts(parts) => parts.join(" "),
        }
    }

    /// Build from provider segments, collapsing a single segment to `Text`
    pub fn from_parts(mut parts: Vec<String>) -> Self {
        if parts.len() == 1 {
            ModelOutput::Text(parts.remove(0))
        } else {
            ModelOutput::Parts(parts)
        }
    }
}

/// Unified LLM client interface
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt, return the raw completion
    async fn complete(&self, prompt: &str) -> LlmResult<ModelOutput>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_are_joined_with_space() {
        let output = ModelOutput::Parts(vec!["{\"action\":".into(), "\"get_all\"}".into()]);
        assert_eq!(output.into_text(), "{\"action\": \"get_all\"}");
    }

    #[test]
    fn test_single_part_collapses() {
        assert_eq!(
            ModelOutput::from_parts(vec!["x".into()]),
            ModelOutput::Text("x".into())
        );
        assert_eq!(ModelOutput::from_parts(vec![]).into_text(), "");
    }
}
