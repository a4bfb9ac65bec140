//! Command Dispatcher
//!
//! Routes a resolved [`Command`] to one of six handlers and turns whatever
//! happens into an [`Envelope`]. Handler failures never escape: targeting,
//! validation and store errors all come back as `success: false`.

mod envelope;
mod handlers;

use std::sync::Arc;

use tracing::{error, info};

pub use envelope::Envelope;

use crate::command::{Action, Command};
use crate::error::CrudError;
use crate::store::DocumentStore;

/// Default cap on documents returned by `get_all`
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Executes commands against a document store
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn DocumentStore>,
    page_size: usize,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Execute `command` and shape its result
    pub async fn dispatch(&self, command: &Command) -> Envelope {
        let outcome = match command.action {
            Action::Insert => handlers::insert(self.store.as_ref(), command).await,
            Action::GetOne => handlers::get_one(self.store.as_ref(), command).await,
            Action::GetAll => handlers::get_all(self.store.as_ref(), command, self.page_size).await,
            Action::Update => handlers::update(self.store.as_ref(), command).await,
            Action::Patch => handlers::patch(self.store.as_ref(), command).await,
            Action::Delete => handlers::delete(self.store.as_ref(), command).await,
        };

        match outcome {
            Ok(envelope) => {
                info!(
                    action = %command.action,
                    collection = %command.collection,
                    "command executed"
                );
                envelope
            }
            Err(err) => {
                if matches!(err, CrudError::Store(_)) {
                    error!(
                        action = %command.action,
                        collection = %command.collection,
                        error = %err,
                        "command failed"
                    );
                } else {
                    info!(
                        action = %command.action,
                        collection = %command.collection,
                        error = %err,
                        "command rejected"
                    );
                }
                Envelope::failed(
                    command.action,
                    command.collection,
                    failure_message(command.action, &err),
                )
            }
        }
    }
}

/// Error text for a failed envelope
///
/// Store faults carry the handler name (`Insert failed: …`); everything else
/// already reads as a complete message.
fn failure_message(action: Action, err: &CrudError) -> String {
    match err {
        CrudError::Store(inner) => format!("{} failed: {}", handler_label(action), inner),
        other => other.to_string(),
    }
}

fn handler_label(action: Action) -> &'static str {
    match action {
        Action::Insert => "Insert",
        Action::GetOne => "Get one",
        Action::GetAll => "Get all",
        Action::Update => "Update",
        Action::Patch => "Patch",
        Action::Delete => "Delete",
    }
}
