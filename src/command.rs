//! The resolved, executable form of one request

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::Envelope;
use crate::filter::Filter;
use crate::schema::Collection;
use crate::store::{Projection, SortKey};
use crate::value::Document;

/// CRUD operation a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Insert,
    GetOne,
    #[default]
    GetAll,
    /// Full replace
    Update,
    /// Partial update
    Patch,
    Delete,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Insert,
        Action::GetOne,
        Action::GetAll,
        Action::Update,
        Action::Patch,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Insert => "insert",
            Action::GetOne => "get_one",
            Action::GetAll => "get_all",
            Action::Update => "update",
            Action::Patch => "patch",
            Action::Delete => "delete",
        }
    }

    /// Actions that carry an `item` payload
    pub fn writes_item(&self) -> bool {
        matches!(self, Action::Insert | Action::Update | Action::Patch)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['-', ' '], "_");
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == normalised)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// One request, from raw text to result
///
/// Built fresh per request by the orchestrator and consumed once by the
/// dispatcher, which fills in `result`.
#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub user_input: String,
    pub action: Action,
    pub collection: Collection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Read shaping; only `get_all` applies these
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Why the model path was abandoned, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Envelope>,
}

impl Command {
    pub fn new(user_input: impl Into<String>, action: Action, collection: Collection) -> Self {
        Self {
            user_input: user_input.into(),
            action,
            collection,
            item_id: None,
            item: None,
            filter: None,
            projection: None,
            sort: None,
            limit: None,
            error: None,
            result: None,
        }
    }

    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn with_item(mut self, item: Document) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}
