//! Decision Orchestrator
//!
//! Turns one request into one resolved [`Command`], trying the model first
//! and the deterministic extractor second.
//!
//! # State Machine
//!
//! | State           | Event                     | Next State      |
//! |-----------------|---------------------------|-----------------|
//! | Start           | model configured          | ModelAttempt    |
//! | Start           | no model                  | FallbackAttempt |
//! | ModelAttempt    | `Decision::Resolved`      | Resolved        |
//! | ModelAttempt    | `Decision::Failed`        | FallbackAttempt |
//! | FallbackAttempt | (always)                  | Resolved        |
//!
//! The model is asked at most once per request. A fallback command carries
//! only what the extractor produced, plus the failure reason in `error`.

use super::decider::{Decision, ModelDecider};
use crate::command::Command;
use crate::error::DecisionFailure;
use crate::extract::extract_command;
use crate::schema::Collection;

/// Where a request is in its resolution
#[derive(Debug)]
enum ResolutionState {
    Start,
    ModelAttempt,
    FallbackAttempt(DecisionFailure),
    Resolved(Command),
}

impl ResolutionState {
    fn label(&self) -> &'static str {
        match self {
            ResolutionState::Start => "start",
            ResolutionState::ModelAttempt => "model_attempt",
            ResolutionState::FallbackAttempt(_) => "fallback_attempt",
            ResolutionState::Resolved(_) => "resolved",
        }
    }
}

/// Resolves requests into commands
#[derive(Clone)]
pub struct DecisionOrchestrator {
    decider: Option<ModelDecider>,
    default_collection: Collection,
}

impl DecisionOrchestrator {
    pub fn new(decider: Option<ModelDecider>, default_collection: Collection) -> Self {
        Self {
            decider,
            default_collection,
        }
    }

    /// Never consults a model
    pub fn fallback_only(default_collection: Collection) -> Self {
        Self::new(None, default_collection)
    }

    pub fn has_model(&self) -> bool {
        self.decider.is_some()
    }

    /// Resolve `user_input`; always yields a command
    pub async fn resolve(&self, user_input: &str) -> Command {
        let mut state = ResolutionState::Start;
        loop {
            let from = state.label();
            state = match state {
                ResolutionState::Start => match self.decider {
                    Some(_) => ResolutionState::ModelAttempt,
                    None => ResolutionState::FallbackAttempt(DecisionFailure::Unavailable),
                },
                ResolutionState::ModelAttempt => match &self.decider {
                    Some(decider) => match decider.decide(user_input).await {
                        Decision::Resolved(command) => ResolutionState::Resolved(command),
                        Decision::Failed(failure) => ResolutionState::FallbackAttempt(failure),
                    },
                    None => ResolutionState::FallbackAttempt(DecisionFailure::Unavailable),
                },
                ResolutionState::FallbackAttempt(failure) => {
                    if failure == DecisionFailure::Unavailable {
                        tracing::debug!("no model configured, using deterministic extraction");
                    } else {
                        tracing::warn!(reason = %failure, "model decision failed, falling back");
                    }
                    let mut command = extract_command(user_input, self.default_collection);
                    command.error = Some(format!(
                        "model decision failed: {}; using deterministic fallback",
                        failure
                    ));
                    ResolutionState::Resolved(command)
                }
                ResolutionState::Resolved(command) => return command,
            };
            tracing::debug!(from, to = state.label(), "decision transition");
        }
    }
}
