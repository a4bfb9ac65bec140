//! Anthropic Client
//!
//! LLM client implementation for Anthropic Claude API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::llm_client::{LlmClient, LlmConfig, ModelOutput};
use crate::error::{LlmError, LlmResult};

/// Default Anthropic model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic Claude API client
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::Authentication);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            api_key: config.api_key,
            client,
            model: config.model,
            max_tokens: config.max_tokens.unwrap_or(1024),
            temperature: config.temperature,
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": &self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}]
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }

    fn text_blocks(response: ApiResponse) -> LlmResult<Vec<String>> {
        let parts: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if parts.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Empty response from Anthropic".to_string(),
            ));
        }
        Ok(parts)
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> LlmResult<ModelOutput> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending request to Anthropic API");

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "Anthropic API error {}: {}",
                status, body
            )));
        }

        let api_response: ApiResponse = response.json().await?;
        Ok(ModelOutput::from_parts(Self::text_blocks(api_response)?))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> LlmConfig {
        LlmConfig {
            api_key: "test-key".to_string(),
            model: model.to_string(),
            max_tokens: None,
            temperature: Some(0.1),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_new_client() {
        let client = AnthropicClient::new(config(DEFAULT_MODEL)).unwrap();
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "Anthropic");
    }

    #[test]
    fn test_with_model() {
        let client = AnthropicClient::new(config("claude-3-opus")).unwrap();
        assert_eq!(client.model_name(), "claude-3-opus");
        let body = client.request_body("hi");
        assert_eq!(body["model"], "claude-3-opus");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_only_text_blocks_are_kept() {
        let response: ApiResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "text", "text": "{\"action\": \"get_all\","},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "\"collection\": \"users\"}"}
            ]
        }))
        .unwrap();
        let parts = AnthropicClient::text_blocks(response).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[tokio::test]
    #[ignore = "Requires ANTHROPIC_API_KEY"]
    async fn test_live_completion() {
        let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap();
        let client = AnthropicClient::new(LlmConfig {
            api_key,
            ..config(DEFAULT_MODEL)
        })
        .unwrap();
        let output = client.complete("Reply with {\"ok\": true}").await.unwrap();
        assert!(output.into_text().contains('{'));
    }
}
