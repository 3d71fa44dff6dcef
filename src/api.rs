//! HTTP API for Salom AI

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::conversation::ConversationStore;
use crate::persona::Persona;
use crate::session::SessionHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub store: Arc<ConversationStore>,
    pub persona: Persona,
    /// Model id of the configured provider, if any
    pub model_id: Option<String>,
}
