//! Turn lifecycle for the conversation
//!
//! A pure `transition` function decides what each event means; the
//! [`SessionRuntime`] owns the state, applies effects to the
//! [`ConversationStore`](crate::conversation::ConversationStore) and runs
//! provider calls. Callers talk to it through a [`SessionHandle`].

mod runtime;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use runtime::{SessionHandle, SessionRuntime};

use thiserror::Error;

/// Why a user action was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a reply is already in progress")]
    Busy,
    #[error("no suggested response at index {0}")]
    NoSuchSuggestion(usize),
    #[error("session runtime has stopped")]
    RuntimeStopped,
}
