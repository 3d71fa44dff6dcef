//! API request and response types

use crate::conversation::{ConversationSnapshot, Insight, Message, Role};
use crate::markdown::render_markdown;
use crate::persona::Starter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Request to send one of the suggested responses
#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub index: usize,
}

/// Response for chat and suggestion actions
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub queued: bool,
}

/// Response for cancel and sidebar actions
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
}

/// A message as the page renders it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Model replies rendered from Markdown; user text is shown verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        let html = match message.role {
            Role::Model => Some(render_markdown(&message.text)),
            Role::User => None,
        };
        Self {
            id: message.id,
            role: message.role,
            text: message.text,
            html,
            timestamp: message.timestamp,
        }
    }
}

/// Full conversation state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub messages: Vec<MessageView>,
    pub insight: Option<Insight>,
    pub loading: bool,
    pub sidebar_open: bool,
    pub error: Option<String>,
}

impl From<ConversationSnapshot> for ConversationResponse {
    fn from(snapshot: ConversationSnapshot) -> Self {
        Self {
            messages: snapshot.messages.into_iter().map(MessageView::from).collect(),
            insight: snapshot.insight,
            loading: snapshot.loading,
            sidebar_open: snapshot.sidebar_open,
            error: snapshot.error,
        }
    }
}

/// Persona and model served by this deployment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaResponse {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` when no API key is configured
    pub model: Option<String>,
    pub starters: &'static [Starter],
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
