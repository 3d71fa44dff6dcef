//! In-memory conversation store with change notifications

use super::{Insight, Message};
use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 128;

/// Notification emitted after every store mutation
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    MessageAppended { message: Message },
    LoadingChanged { loading: bool },
    InsightChanged { insight: Option<Insight> },
    SidebarChanged { open: bool },
    ErrorChanged { error: Option<String> },
}

/// Point-in-time copy of the store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub insight: Option<Insight>,
    pub loading: bool,
    pub sidebar_open: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    messages: Vec<Message>,
    insight: Option<Insight>,
    loading: bool,
    sidebar_open: bool,
    error: Option<String>,
}

/// Single source of truth for rendering.
///
/// A pure state container: no validation happens here. Every mutation is
/// broadcast to subscribers after the write lock is released.
pub struct ConversationStore {
    state: RwLock<StoreState>,
    events: broadcast::Sender<ConversationEvent>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(StoreState::default()),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: ConversationEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Subscribe to mutations made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Append at the end. The caller guarantees `id` uniqueness.
    pub fn append_message(&self, message: Message) {
        self.write().messages.push(message.clone());
        self.notify(ConversationEvent::MessageAppended { message });
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
        self.notify(ConversationEvent::LoadingChanged { loading });
    }

    /// Replace the insight wholesale; `None` means "no insight yet"
    pub fn set_insight(&self, insight: Option<Insight>) {
        self.write().insight.clone_from(&insight);
        self.notify(ConversationEvent::InsightChanged { insight });
    }

    /// Flip the sidebar flag, returning the new value
    pub fn toggle_sidebar(&self) -> bool {
        let open = {
            let mut state = self.write();
            state.sidebar_open = !state.sidebar_open;
            state.sidebar_open
        };
        self.notify(ConversationEvent::SidebarChanged { open });
        open
    }

    pub fn set_error(&self, error: Option<String>) {
        {
            let mut state = self.write();
            if state.error == error {
                return;
            }
            state.error.clone_from(&error);
        }
        self.notify(ConversationEvent::ErrorChanged { error });
    }

    pub fn messages(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    pub fn insight(&self) -> Option<Insight> {
        self.read().insight.clone()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        let state = self.read();
        ConversationSnapshot {
            messages: state.messages.clone(),
            insight: state.insight.clone(),
            loading: state.loading,
            sidebar_open: state.sidebar_open,
            error: state.error.clone(),
        }
    }
}
