//! CRUD Agent - natural-language requests to document store operations
//!
//! A request goes through two stages:
//!
//! Text -> Decision (model, else deterministic extraction) -> Command -> Dispatch -> Envelope
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crud_agent::{Agent, AgentConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let agent = Agent::open(&AgentConfig::from_env()?).await?;
//! let command = agent.process("create user with name John and email john@example.com").await;
//! println!("{}", serde_json::to_string_pretty(&command)?);
//! agent.close().await;
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Data model
pub mod command;
pub mod filter;
pub mod schema;
pub mod value;

// Request resolution
pub mod agentic;
pub mod decision;
pub mod extract;

// Execution
pub mod dispatch;
pub mod store;

pub mod agent;
pub mod config;

pub use agent::Agent;
pub use command::{Action, Command};
pub use config::AgentConfig;
pub use dispatch::Envelope;
pub use error::{CrudError, DecisionFailure, StoreError, TargetingError, ValidationError};
pub use filter::{Filter, Predicate};
pub use schema::Collection;
pub use value::{Document, ObjectId, Value};
