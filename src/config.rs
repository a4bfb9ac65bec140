//! Agent configuration
//!
//! Read from the process environment after loading `.env` (if present).
//! A missing API key for the selected backend is not an error: the agent
//! then runs on the deterministic path only.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::agentic::{anthropic_client, gemini_client, AgentBackend, LlmConfig};
use crate::schema::Collection;

/// Everything needed to open an [`Agent`](crate::Agent)
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub backend: AgentBackend,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub llm_timeout: Duration,
    pub default_collection: Collection,
    /// Upper bound on documents returned by `get_all`
    pub page_size: usize,
    pub seed_file: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            backend: AgentBackend::default(),
            gemini_api_key: None,
            gemini_model: gemini_client::DEFAULT_MODEL.to_string(),
            anthropic_api_key: None,
            anthropic_model: anthropic_client::DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: Some(1024),
            llm_timeout: Duration::from_secs(30),
            default_collection: Collection::Users,
            page_size: 100,
            seed_file: None,
        }
    }
}

impl AgentConfig {
    /// Load `.env`, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(backend) = get("AGENT_BACKEND") {
            config.backend = backend.parse().map_err(|e| anyhow!("{}", e))?;
        }
        config.gemini_api_key = get("GOOGLE_API_KEY").or_else(|| get("GEMINI_API_KEY"));
        config.anthropic_api_key = get("ANTHROPIC_API_KEY");

        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(model) = get("ANTHROPIC_MODEL") {
            config.anthropic_model = model;
        }
        if let Some(temperature) = get("LLM_TEMPERATURE") {
            config.temperature = temperature
                .parse()
                .with_context(|| format!("LLM_TEMPERATURE must be a number, got '{}'", temperature))?;
        }
        if let Some(secs) = get("LLM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("LLM_TIMEOUT_SECS must be whole seconds, got '{}'", secs))?;
            config.llm_timeout = Duration::from_secs(secs);
        }
        if let Some(name) = get("DEFAULT_COLLECTION") {
            config.default_collection = name
                .parse()
                .with_context(|| format!("DEFAULT_COLLECTION '{}' is not registered", name))?;
        }
        if let Some(size) = get("PAGE_SIZE") {
            config.page_size = size
                .parse()
                .with_context(|| format!("PAGE_SIZE must be a positive integer, got '{}'", size))?;
            if config.page_size == 0 {
                return Err(anyhow!("PAGE_SIZE must be greater than zero"));
            }
        }
        config.seed_file = get("SEED_FILE").map(PathBuf::from);

        Ok(config)
    }

    /// Configuration that never calls a model
    pub fn offline() -> Self {
        Self {
            backend: AgentBackend::None,
            ..Self::default()
        }
    }

    /// Provider settings for the selected backend, if it has a key
    pub fn llm_config(&self) -> Option<LlmConfig> {
        let (api_key, model) = match self.backend {
            AgentBackend::Gemini => (self.gemini_api_key.as_ref()?, &self.gemini_model),
            AgentBackend::Anthropic => (self.anthropic_api_key.as_ref()?, &self.anthropic_model),
            AgentBackend::None => return None,
        };
        Some(LlmConfig {
            api_key: api_key.clone(),
            model: model.clone(),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            timeout_seconds: self.llm_timeout.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend, AgentBackend::Gemini);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.default_collection, Collection::Users);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert!(config.llm_config().is_none());
    }

    #[test]
    fn test_gemini_key_fallback_name() {
        let config = AgentConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "g-key")])).unwrap();
        let llm = config.llm_config().unwrap();
        assert_eq!(llm.api_key, "g-key");
        assert_eq!(llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_anthropic_backend() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("AGENT_BACKEND", "claude"),
            ("ANTHROPIC_API_KEY", "a-key"),
            ("ANTHROPIC_MODEL", "claude-3-haiku"),
            ("LLM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        let llm = config.llm_config().unwrap();
        assert_eq!(llm.model, "claude-3-haiku");
        assert_eq!(llm.timeout_seconds, 5);
    }

    #[test]
    fn test_offline_backend_ignores_keys() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("AGENT_BACKEND", "none"),
            ("GOOGLE_API_KEY", "g-key"),
        ]))
        .unwrap();
        assert!(config.llm_config().is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(AgentConfig::from_lookup(lookup(&[("DEFAULT_COLLECTION", "widgets")])).is_err());
        assert!(AgentConfig::from_lookup(lookup(&[("PAGE_SIZE", "0")])).is_err());
        assert!(AgentConfig::from_lookup(lookup(&[("LLM_TEMPERATURE", "warm")])).is_err());
        assert!(AgentConfig::from_lookup(lookup(&[("AGENT_BACKEND", "gpt")])).is_err());
    }

    #[test]
    fn test_default_collection_override() {
        let config =
            AgentConfig::from_lookup(lookup(&[("DEFAULT_COLLECTION", "Contacts")])).unwrap();
        assert_eq!(config.default_collection, Collection::Contacts);
    }
}
