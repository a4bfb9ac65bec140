//! Decision Layer
//!
//! - `prompt` - directive sent to the model
//! - `decider` - one bounded model call, parsed into a [`Decision`]
//! - `orchestrator` - model first, deterministic extraction second

pub mod decider;
pub mod orchestrator;
pub mod prompt;

pub use decider::{parse_model_response, Decision, ModelDecider};
pub use orchestrator::DecisionOrchestrator;
pub use prompt::build_directive;
