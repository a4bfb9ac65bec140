//! Backend Selection
//!
//! Enum for selecting the model provider (Gemini, Anthropic) or none at all.

use std::str::FromStr;

/// LLM backend provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBackend {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// Anthropic Claude
    Anthropic,
    /// No model; every request takes the deterministic path
    None,
}

impl AgentBackend {
    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            AgentBackend::Gemini => "Gemini",
            AgentBackend::Anthropic => "Anthropic",
            AgentBackend::None => "None",
        }
    }
}

/// Error type for parsing AgentBackend
#[derive(Debug)]
pub struct ParseBackendError(String);

impl std::fmt::Display for ParseBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseBackendError {}

impl FromStr for AgentBackend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(AgentBackend::Gemini),
            "anthropic" | "claude" => Ok(AgentBackend::Anthropic),
            "none" | "offline" => Ok(AgentBackend::None),
            other => Err(ParseBackendError(format!(
                "Unknown AGENT_BACKEND '{}'. Valid values: gemini, google, anthropic, claude, none, offline",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AgentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
