//! Agent context
//!
//! Owns everything one request needs: the decision orchestrator (with its
//! optional model client) and the dispatcher (with its store). Built once by
//! [`Agent::open`], shared behind `Arc` across concurrent requests, released
//! with [`Agent::close`].

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::agentic::{create_llm_client, LlmClient};
use crate::command::Command;
use crate::config::AgentConfig;
use crate::decision::{DecisionOrchestrator, ModelDecider};
use crate::dispatch::Dispatcher;
use crate::schema::{Collection, SchemaDescriptor};
use crate::store::{load_seed_file, DocumentStore, InMemoryStore};

pub struct Agent {
    orchestrator: DecisionOrchestrator,
    dispatcher: Dispatcher,
}

impl Agent {
    /// Build the model client (if configured), open an in-memory store and
    /// apply the seed file
    pub async fn open(config: &AgentConfig) -> Result<Self> {
        let client = create_llm_client(config)?;
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        if let Some(path) = &config.seed_file {
            load_seed_file(store.as_ref(), path).await?;
        }
        let agent = Self::with_parts(config, client, store);
        info!(
            model = agent.orchestrator.has_model(),
            default_collection = %config.default_collection,
            "agent opened"
        );
        Ok(agent)
    }

    /// Assemble from already-built collaborators
    pub fn with_parts(
        config: &AgentConfig,
        client: Option<Arc<dyn LlmClient>>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let decider = client.map(|client| {
            ModelDecider::new(client, config.llm_timeout, config.default_collection)
        });
        Self {
            orchestrator: DecisionOrchestrator::new(decider, config.default_collection),
            dispatcher: Dispatcher::new(store, config.page_size),
        }
    }

    /// Deterministic extraction only, over the given store
    pub fn fallback_only(config: &AgentConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_parts(config, None, store)
    }

    /// Resolve a command without executing it
    pub async fn resolve(&self, user_input: &str) -> Command {
        self.orchestrator.resolve(user_input).await
    }

    /// Resolve and execute one request; the envelope is in `result`
    pub async fn process(&self, user_input: &str) -> Command {
        let span = info_span!("request", id = %Uuid::new_v4());
        async {
            let mut command = self.resolve(user_input).await;
            command.result = Some(self.dispatcher.dispatch(&command).await);
            command
        }
        .instrument(span)
        .await
    }

    /// Registered collections with their field tables, in registry order
    pub fn collections(&self) -> Vec<SchemaDescriptor> {
        Collection::ALL.iter().map(Collection::descriptor).collect()
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        self.dispatcher.store()
    }

    pub async fn close(&self) {
        self.dispatcher.store().close().await;
        info!("agent closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Action;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_agent_is_shareable() {
        assert_send_sync::<Agent>();
    }

    #[tokio::test]
    async fn test_offline_open_and_process() {
        let agent = Agent::open(&AgentConfig::offline()).await.unwrap();
        let command = agent
            .process("create user with name John and email john@example.com")
            .await;
        assert_eq!(command.action, Action::Insert);
        let result = command.result.unwrap();
        assert!(result.success, "{:?}", result.error);
        assert!(result.get("inserted_id").is_some());
        assert_eq!(agent.collections().len(), 20);
        agent.close().await;
    }
}
