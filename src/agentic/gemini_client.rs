//! Google Gemini API Client
//!
//! Sends the decision directive as a single user turn to `generateContent`
//! and returns every text part of the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::llm_client::{LlmClient, LlmConfig, ModelOutput};
use crate::error::{LlmError, LlmResult};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: LlmConfig,
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::Authentication);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.config.model)
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            }),
        }
    }

    fn extract_parts(response: GeminiResponse) -> LlmResult<Vec<String>> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

        let parts: Vec<String> = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if parts.is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "No text parts in candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(parts)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> LlmResult<ModelOutput> {
        let url = self.endpoint();
        debug!(url = %url, prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Gemini API response status: {}", status);

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, body);
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            LlmError::Json(e)
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            info!(
                "Gemini API usage - Prompt: {:?} tokens, Response: {:?} tokens, Total: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Ok(ModelOutput::from_parts(Self::extract_parts(parsed)?))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.1),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new(create_test_config()).unwrap();
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "Gemini");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let mut config = create_test_config();
        config.api_key.clear();
        assert!(matches!(
            GeminiClient::new(config),
            Err(LlmError::Authentication)
        ));
    }

    #[test]
    fn test_endpoint_does_not_carry_key() {
        let client = GeminiClient::new(create_test_config()).unwrap();
        let url = client.endpoint();
        assert!(url.ends_with("gemini-1.5-flash:generateContent"));
        assert!(!url.contains("test-key"));
    }

    #[test]
    fn test_request_shape() {
        let client = GeminiClient::new(create_test_config()).unwrap();
        let body = serde_json::to_value(client.build_request("hello")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_multi_part_candidate() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"action\":"}, {"text": "\"get_all\"}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        let parts = GeminiClient::extract_parts(response).unwrap();
        assert_eq!(
            ModelOutput::from_parts(parts),
            ModelOutput::Parts(vec!["{\"action\":".into(), "\"get_all\"}".into()])
        );
    }

    #[test]
    fn test_blocked_candidate_is_invalid() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        let err = GeminiClient::extract_parts(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    #[ignore = "Requires GOOGLE_API_KEY"]
    async fn test_live_completion() {
        let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
        let client = GeminiClient::new(LlmConfig {
            api_key,
            ..create_test_config()
        })
        .unwrap();
        let output = client.complete("Reply with {\"ok\": true}").await.unwrap();
        assert!(output.into_text().contains('{'));
    }
}
