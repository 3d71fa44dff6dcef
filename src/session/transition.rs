//! Pure state transition function
//!
//! Given the same state and event this always produces the same outcome,
//! with no I/O. The runtime applies the returned effects to the store.

use super::state::{Effect, SessionEvent, SessionState};
use super::SessionError;
use crate::conversation::Role;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn transition(
    state: &SessionState,
    event: SessionEvent,
) -> Result<TransitionResult, SessionError> {
    match (*state, event) {
        // ============================================================
        // User input
        // ============================================================
        (SessionState::Idle { last_turn }, SessionEvent::UserSubmit { text }) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(SessionError::EmptyInput);
            }
            let turn = last_turn + 1;
            Ok(TransitionResult::new(SessionState::AwaitingReply { turn })
                .with_effect(Effect::SetError(None))
                .with_effect(Effect::RequestReply {
                    turn,
                    text: text.clone(),
                })
                .with_effect(Effect::AppendMessage {
                    role: Role::User,
                    text,
                })
                .with_effect(Effect::SetLoading(true)))
        }

        (SessionState::AwaitingReply { .. }, SessionEvent::UserSubmit { .. }) => {
            Err(SessionError::Busy)
        }

        // ============================================================
        // Provider outcomes
        // ============================================================
        (SessionState::AwaitingReply { turn }, SessionEvent::ReplyReceived { turn: t, reply })
            if t == turn =>
        {
            Ok(TransitionResult::new(SessionState::Idle { last_turn: turn })
                .with_effect(Effect::AppendMessage {
                    role: Role::Model,
                    text: reply.reply,
                })
                .with_effect(Effect::SetInsight(reply.insight))
                .with_effect(Effect::SetLoading(false)))
        }

        // The user's own turn stays; the insight is left as it was
        (SessionState::AwaitingReply { turn }, SessionEvent::TurnFailed { turn: t, error })
            if t == turn =>
        {
            Ok(TransitionResult::new(SessionState::Idle { last_turn: turn })
                .with_effect(Effect::AppendMessage {
                    role: Role::Model,
                    text: error.fallback_message().to_string(),
                })
                .with_effect(Effect::SetError(Some(error.to_string())))
                .with_effect(Effect::SetLoading(false)))
        }

        // Outcome of a cancelled or superseded turn
        (_, SessionEvent::ReplyReceived { .. } | SessionEvent::TurnFailed { .. }) => {
            Ok(TransitionResult::new(*state))
        }

        // ============================================================
        // Cancellation
        // ============================================================
        (SessionState::AwaitingReply { turn }, SessionEvent::UserCancel) => {
            Ok(TransitionResult::new(SessionState::Idle { last_turn: turn })
                .with_effect(Effect::AbortRequest)
                .with_effect(Effect::SetLoading(false)))
        }

        (SessionState::Idle { .. }, SessionEvent::UserCancel) => Ok(TransitionResult::new(*state)),

        // ============================================================
        // UI flags
        // ============================================================
        (_, SessionEvent::ToggleSidebar) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::ToggleSidebar))
        }
    }
}
