//! Client construction for the configured backend

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::anthropic_client::AnthropicClient;
use super::backend::AgentBackend;
use super::gemini_client::GeminiClient;
use super::llm_client::LlmClient;
use crate::config::AgentConfig;

/// Build the model client, or `None` when the agent should run offline
///
/// A selected backend without an API key degrades to offline with a warning.
pub fn create_llm_client(config: &AgentConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    if config.backend == AgentBackend::None {
        info!("No model backend selected; using deterministic extraction only");
        return Ok(None);
    }

    let Some(llm_config) = config.llm_config() else {
        warn!(
            backend = %config.backend,
            "API key not configured; using deterministic extraction only"
        );
        return Ok(None);
    };

    let client: Arc<dyn LlmClient> = match config.backend {
        AgentBackend::Gemini => Arc::new(GeminiClient::new(llm_config)?),
        AgentBackend::Anthropic => Arc::new(AnthropicClient::new(llm_config)?),
        AgentBackend::None => return Ok(None),
    };

    info!(
        provider = client.provider_name(),
        model = client.model_name(),
        "Model client ready"
    );
    Ok(Some(client))
}
