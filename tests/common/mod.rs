//! Shared test doubles

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crud_agent::agentic::{LlmClient, ModelOutput};
use crud_agent::error::{LlmError, LlmResult};
use crud_agent::store::{DocumentStore, InMemoryStore};
use crud_agent::{Agent, AgentConfig};

/// What the scripted model does on one call
pub enum Reply {
    Text(&'static str),
    Parts(Vec<&'static str>),
    Fail(&'static str),
    Hang,
}

/// Plays back replies in order; an exhausted script fails the call
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> LlmResult<ModelOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(ModelOutput::Text(text.to_string())),
            Some(Reply::Parts(parts)) => Ok(ModelOutput::Parts(
                parts.into_iter().map(str::to_string).collect(),
            )),
            Some(Reply::Fail(message)) => Err(LlmError::Api(message.to_string())),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(LlmError::Api("woke up".to_string()))
            }
            None => Err(LlmError::Api("script exhausted".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "Scripted"
    }
}

pub fn test_config() -> AgentConfig {
    AgentConfig {
        llm_timeout: Duration::from_millis(200),
        ..AgentConfig::offline()
    }
}

/// Agent over a fresh in-memory store, with the store handed back for setup
pub fn agent_with(client: Option<Arc<ScriptedClient>>) -> (Agent, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let client = client.map(|c| c as Arc<dyn LlmClient>);
    let agent = Agent::with_parts(&test_config(), client, store.clone() as Arc<dyn DocumentStore>);
    (agent, store)
}
