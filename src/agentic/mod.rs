//! Model Providers
//!
//! The decision layer talks to a language model only through [`LlmClient`].
//!
//! - `gemini_client` - Google Gemini `generateContent`
//! - `anthropic_client` - Anthropic Messages API
//! - `backend` - `AGENT_BACKEND` selection
//! - `client_factory` - builds the configured client, or none

pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod gemini_client;
pub mod llm_client;

pub use anthropic_client::AnthropicClient;
pub use backend::AgentBackend;
pub use client_factory::create_llm_client;
pub use gemini_client::GeminiClient;
pub use llm_client::{LlmClient, LlmConfig, ModelOutput};
