//! Model-Assisted Decider
//!
//! One model call per request, bounded by a timeout. The reply is reduced to
//! the text between its first `{` and last `}` and read as a command. Every
//! way this can go wrong is a [`DecisionFailure`]; nothing is retried and no
//! partial result escapes.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value as Json};
use tracing::{debug, info};

use super::prompt::build_directive;
use crate::agentic::LlmClient;
use crate::command::{Action, Command};
use crate::error::DecisionFailure;
use crate::filter::{Filter, FilterParseError};
use crate::schema::Collection;
use crate::store::{Projection, SortKey};
use crate::value::document_from_json;

/// Outcome of the model path
#[derive(Debug, Clone)]
pub enum Decision {
    Resolved(Command),
    Failed(DecisionFailure),
}

/// Asks the model to resolve a request
#[derive(Clone)]
pub struct ModelDecider {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
    default_collection: Collection,
}

impl ModelDecider {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration, default_collection: Collection) -> Self {
        Self {
            client,
            timeout,
            default_collection,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub async fn decide(&self, user_input: &str) -> Decision {
        let directive = build_directive(user_input);
        debug!(
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            directive_len = directive.len(),
            "requesting model decision"
        );

        let output = match tokio::time::timeout(self.timeout, self.client.complete(&directive)).await
        {
            Err(_) => return Decision::Failed(DecisionFailure::Timeout(self.timeout)),
            Ok(Err(e)) => return Decision::Failed(DecisionFailure::Call(e.to_string())),
            Ok(Ok(output)) => output,
        };

        match parse_model_response(user_input, &output.into_text(), self.default_collection) {
            Ok(command) => {
                info!(
                    action = %command.action,
                    collection = %command.collection,
                    "model decision resolved"
                );
                Decision::Resolved(command)
            }
            Err(failure) => Decision::Failed(failure),
        }
    }
}

/// Slice from the first `{` to the last `}`
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Turn raw model text into a command
///
/// Accepts `schema` for `collection` and `query` for `filter`. Collection
/// names are resolved leniently; `get_all` without a filter matches all.
pub fn parse_model_response(
    user_input: &str,
    text: &str,
    default_collection: Collection,
) -> Result<Command, DecisionFailure> {
    let span = json_span(text).ok_or(DecisionFailure::NoJson)?;
    let parsed: Json =
        serde_json::from_str(span).map_err(|e| DecisionFailure::MalformedJson(e.to_string()))?;
    let Json::Object(object) = parsed else {
        return Err(DecisionFailure::MalformedJson(
            "expected a JSON object".to_string(),
        ));
    };

    let action = match present(&object, &["action"]) {
        None => return Err(DecisionFailure::MissingKey("action")),
        Some(Json::String(s)) => s
            .parse::<Action>()
            .map_err(|_| DecisionFailure::UnknownAction(s.clone()))?,
        Some(other) => return Err(DecisionFailure::UnknownAction(other.to_string())),
    };

    let collection = match present(&object, &["collection", "schema"]) {
        Some(Json::String(name)) => Collection::fuzzy_resolve(name, default_collection),
        Some(_) => default_collection,
        None => return Err(DecisionFailure::MissingKey("collection")),
    };

    let item_id = match present(&object, &["item_id"]) {
        Some(Json::String(s)) if !s.trim().is_empty() && s.trim() != "null" => {
            Some(s.trim().to_string())
        }
        _ => None,
    };

    let item = match present(&object, &["item"]) {
        None => None,
        Some(json) if json.is_object() => {
            document_from_json(json.clone()).filter(|doc| !doc.is_empty())
        }
        Some(_) => return Err(DecisionFailure::InvalidItem),
    };

    let filter = match present(&object, &["filter", "query"]) {
        None => None,
        Some(json) => Some(
            Filter::from_json(json).map_err(|e| DecisionFailure::InvalidFilter(e.to_string()))?,
        ),
    };

    let invalid_option = |e: FilterParseError| {
        DecisionFailure::InvalidReadOption(e.to_string())
    };
    let projection = match present(&object, &["projection"]) {
        None => None,
        Some(json) => Projection::from_json(json).map_err(invalid_option)?,
    };
    let sort = match present(&object, &["sort"]) {
        None => None,
        Some(json) => {
            Some(SortKey::list_from_json(json).map_err(invalid_option)?).filter(|keys| !keys.is_empty())
        }
    };
    let limit = match present(&object, &["limit"]) {
        None => None,
        Some(json) => match json.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(limit) => Some(limit),
            None => {
                return Err(DecisionFailure::InvalidReadOption(format!(
                    "limit must be a non-negative integer, found {}",
                    json
                )))
            }
        },
    };

    let mut command = Command::new(user_input, action, collection);
    command.item_id = item_id;
    command.item = item;
    command.projection = projection;
    command.sort = sort;
    command.limit = limit;
    command.filter = match (action, filter) {
        (Action::GetAll, None) => Some(Filter::new()),
        (_, filter) => filter,
    };
    Ok(command)
}

/// First non-null value among `keys`
fn present<'a>(object: &'a Map<String, Json>, keys: &[&str]) -> Option<&'a Json> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}
