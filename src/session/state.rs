//! Session state, events and effects

use crate::conversation::{Insight, Role};
use crate::orchestrator::{TurnError, TurnReply};

/// Turn lifecycle of the single conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for input. `last_turn` is the id of the most recent turn, if any.
    Idle { last_turn: u64 },
    /// Exactly one provider call is in flight
    AwaitingReply { turn: u64 },
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle { last_turn: 0 }
    }
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::AwaitingReply { .. })
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // User intents
    UserSubmit { text: String },
    UserCancel,
    ToggleSidebar,

    // Provider outcomes, tagged with the turn that requested them
    ReplyReceived { turn: u64, reply: TurnReply },
    TurnFailed { turn: u64, error: TurnError },
}

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone)]
pub enum Effect {
    /// Issue the provider call for `text`. History is captured when this
    /// effect runs, so it must precede the user message append.
    RequestReply { turn: u64, text: String },
    AppendMessage { role: Role, text: String },
    SetLoading(bool),
    SetInsight(Insight),
    SetError(Option<String>),
    /// Cancel the in-flight provider call
    AbortRequest,
    ToggleSidebar,
}
