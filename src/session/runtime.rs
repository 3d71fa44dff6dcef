//! Session runtime executor

use super::state::{Effect, SessionEvent, SessionState};
use super::transition::transition;
use super::SessionError;
use crate::conversation::{ConversationStore, Message};
use crate::orchestrator::Orchestrator;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

const COMMAND_BUFFER: usize = 32;

/// An event plus an optional channel for the transition outcome
struct Command {
    event: SessionEvent,
    ack: Option<oneshot::Sender<Result<(), SessionError>>>,
}

/// Single writer for the session state. Every event is processed on one
/// task, so a turn's effects are applied before the next event is seen.
pub struct SessionRuntime {
    state: SessionState,
    store: Arc<ConversationStore>,
    orchestrator: Arc<Orchestrator>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so the loop ends once every handle is dropped
    command_tx: mpsc::WeakSender<Command>,
    /// Token to cancel the in-flight provider call
    request_cancel: Option<CancellationToken>,
}

impl SessionRuntime {
    pub fn new(store: Arc<ConversationStore>, orchestrator: Arc<Orchestrator>) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let runtime = Self {
            state: SessionState::default(),
            store: store.clone(),
            orchestrator,
            command_rx,
            command_tx: command_tx.downgrade(),
            request_cancel: None,
        };
        let handle = SessionHandle { command_tx, store };
        (runtime, handle)
    }

    /// Start the runtime on its own task
    pub fn spawn(store: Arc<ConversationStore>, orchestrator: Arc<Orchestrator>) -> SessionHandle {
        let (runtime, handle) = Self::new(store, orchestrator);
        tokio::spawn(runtime.run());
        handle
    }

    pub async fn run(mut self) {
        tracing::info!(persona = self.orchestrator.persona().id(), "Starting session runtime");

        while let Some(Command { event, ack }) = self.command_rx.recv().await {
            let result = self.process_event(event);
            if let Err(e) = &result {
                tracing::debug!(error = %e, "Event rejected");
            }
            if let Some(ack) = ack {
                let _ = ack.send(result);
            }
        }

        tracing::info!("Session runtime stopped");
    }

    fn process_event(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        if !self.state.is_busy() {
            self.request_cancel = None;
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestReply { turn, text } => self.spawn_request(turn, text),
            Effect::AppendMessage { role, text } => {
                self.store.append_message(Message::new(role, text));
            }
            Effect::SetLoading(loading) => self.store.set_loading(loading),
            Effect::SetInsight(insight) => self.store.set_insight(Some(insight)),
            Effect::SetError(error) => self.store.set_error(error),
            Effect::AbortRequest => {
                if let Some(token) = self.request_cancel.take() {
                    token.cancel();
                }
            }
            Effect::ToggleSidebar => {
                self.store.toggle_sidebar();
            }
        }
    }

    fn spawn_request(&mut self, turn: u64, text: String) {
        // Captured before the user message is appended
        let history = self.store.messages();
        let orchestrator = self.orchestrator.clone();
        let command_tx = self.command_tx.clone();
        let cancel_token = CancellationToken::new();
        self.request_cancel = Some(cancel_token.clone());

        tokio::spawn(async move {
            let result = tokio::select! {
                () = cancel_token.cancelled() => {
                    tracing::info!(turn, "Turn cancelled");
                    return;
                }
                result = orchestrator.send_turn(&history, &text) => result,
            };

            let event = match result {
                Ok(reply) => SessionEvent::ReplyReceived { turn, reply },
                Err(error) => {
                    tracing::warn!(turn, error = %error, kind = ?error.kind(), "Turn failed");
                    SessionEvent::TurnFailed { turn, error }
                }
            };
            match command_tx.upgrade() {
                Some(tx) => {
                    let _ = tx.send(Command { event, ack: None }).await;
                }
                None => tracing::debug!(turn, "Session gone before turn completed"),
            }
        });
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    store: Arc<ConversationStore>,
}

impl SessionHandle {
    /// Submit user text. Blank input is rejected here and never reaches
    /// the runtime or the provider.
    pub async fn submit_text(&self, text: &str) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.request(SessionEvent::UserSubmit {
            text: text.to_string(),
        })
        .await
    }

    /// Submit one of the current insight's suggested responses
    pub async fn select_suggestion(&self, index: usize) -> Result<(), SessionError> {
        let text = self
            .store
            .insight()
            .and_then(|insight| insight.suggestion(index).map(str::to_string))
            .ok_or(SessionError::NoSuchSuggestion(index))?;
        self.submit_text(&text).await
    }

    pub async fn cancel(&self) -> Result<(), SessionError> {
        self.request(SessionEvent::UserCancel).await
    }

    pub async fn toggle_sidebar(&self) -> Result<(), SessionError> {
        self.request(SessionEvent::ToggleSidebar).await
    }

    async fn request(&self, event: SessionEvent) -> Result<(), SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| SessionError::RuntimeStopped)?;
        ack_rx.await.map_err(|_| SessionError::RuntimeStopped)?
    }
}
