//! Error handling for the CRUD agent
//!
//! One `thiserror` enum per concern. Handlers propagate through [`CrudError`]
//! with `?` and turn it into a failed envelope at their boundary, so none of
//! these ever reach the caller as a fault.

use thiserror::Error;

/// Main error type used inside the command handlers
#[derive(Error, Debug)]
pub enum CrudError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Targeting(#[from] TargetingError),

    #[error("No item data provided for {action} operation")]
    MissingPayload { action: String },

    #[error("Document not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Payload validation against the schema registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{field}' for collection '{collection}'")]
    MissingField { field: String, collection: String },

    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("no valid fields for collection '{collection}'")]
    NoValidFields { collection: String },
}

/// Missing or unusable record target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetingError {
    #[error("No item ID or filter provided for {action} operation")]
    NoTarget { action: String },

    #[error("Invalid identifier '{value}': expected 24 hex characters")]
    InvalidIdentifier { value: String },
}

/// Document store failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("duplicate key: _id {0} already exists")]
    DuplicateKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the language model backends
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: API key not configured")]
    Authentication,
}

/// Why the model-assisted decision was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionFailure {
    #[error("no language model configured")]
    Unavailable,

    #[error("model call failed: {0}")]
    Call(String),

    #[error("model call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("no JSON object found in model response")]
    NoJson,

    #[error("malformed JSON in model response: {0}")]
    MalformedJson(String),

    #[error("missing required key '{0}' in model response")]
    MissingKey(&'static str),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("item must be a JSON object")]
    InvalidItem,

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid read option: {0}")]
    InvalidReadOption(String),
}

/// Result alias for handler code
pub type CrudResult<T> = Result<T, CrudError>;

/// Result alias for model backends
pub type LlmResult<T> = Result<T, LlmError>;
