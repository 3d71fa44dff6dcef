//! Request orchestration
//!
//! Turns prior history plus a new utterance into exactly one
//! schema-constrained provider call and validates the structured result.
//! No retries, no caching, no fabricated fallbacks: every failure is
//! returned to the caller as a [`TurnError`].

#[cfg(test)]
mod proptests;

use crate::conversation::{Insight, Message, Role, Sentiment};
use crate::llm::{Content, ContentRole, GenerateRequest, LlmError, LlmService, JSON_MIME_TYPE};
use crate::persona::Persona;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const NETWORK_FALLBACK: &str =
    "I'm having trouble connecting to the network right now. Please try again.";
const CONFIGURATION_FALLBACK: &str =
    "I'm not configured yet: the server has no API key. Set GEMINI_API_KEY and restart.";

/// Successful round trip: the chat reply plus its side-panel insight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub reply: String,
    pub insight: Insight,
}

/// Why a turn produced no reply
#[derive(Debug, Clone, Error)]
pub enum TurnError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("provider call failed: {0}")]
    TransportFailure(#[from] LlmError),
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),
}

/// Wire name of a [`TurnError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnErrorKind {
    MissingCredential,
    TransportFailure,
    EmptyResponse,
    MalformedResponse,
    Timeout,
}

impl TurnError {
    pub fn kind(&self) -> TurnErrorKind {
        match self {
            Self::MissingCredential => TurnErrorKind::MissingCredential,
            Self::TransportFailure(_) => TurnErrorKind::TransportFailure,
            Self::EmptyResponse => TurnErrorKind::EmptyResponse,
            Self::MalformedResponse(_) => TurnErrorKind::MalformedResponse,
            Self::Timeout(_) => TurnErrorKind::Timeout,
        }
    }

    /// Conversational text shown in place of a reply
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MissingCredential => CONFIGURATION_FALLBACK,
            _ => NETWORK_FALLBACK,
        }
    }
}

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub persona: Persona,
    /// Upper bound on a single provider call
    pub timeout: Duration,
    /// Most recent history messages to resend; `None` resends everything
    pub max_history_messages: Option<usize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            persona: Persona::default(),
            timeout: Duration::from_secs(60),
            max_history_messages: None,
        }
    }
}

pub struct Orchestrator {
    /// `None` when no credential was configured
    provider: Option<Arc<dyn LlmService>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(provider: Option<Arc<dyn LlmService>>, config: OrchestratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn persona(&self) -> Persona {
        self.config.persona
    }

    pub fn model_id(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model_id())
    }

    /// Build the provider request for `history` followed by `new_text`
    pub fn build_request(&self, history: &[Message], new_text: &str) -> GenerateRequest {
        let window = match self.config.max_history_messages {
            Some(max) => {
                let recent = &history[history.len().saturating_sub(max)..];
                // Windows open on a user turn
                let skip = recent.iter().take_while(|m| m.role == Role::Model).count();
                &recent[skip..]
            }
            None => history,
        };

        let mut contents = to_contents(window);
        contents.push(Content::text(ContentRole::User, new_text));

        GenerateRequest {
            system_instruction: self.config.persona.system_instruction().to_string(),
            contents,
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: self.config.persona.response_schema(),
        }
    }

    /// Run one turn. `new_text` is expected to be trimmed and non-empty;
    /// the caller enforces that.
    pub async fn send_turn(
        &self,
        history: &[Message],
        new_text: &str,
    ) -> Result<TurnReply, TurnError> {
        let provider = self.provider.as_ref().ok_or(TurnError::MissingCredential)?;
        let request = self.build_request(history, new_text);

        tracing::debug!(
            turns = request.contents.len(),
            persona = self.config.persona.id(),
            "Sending turn"
        );

        let response = tokio::time::timeout(self.config.timeout, provider.generate(&request))
            .await
            .map_err(|_| TurnError::Timeout(self.config.timeout))??;

        let text = response.text.ok_or(TurnError::EmptyResponse)?;
        let result = parse_payload(&text);
        if let Err(e) = &result {
            tracing::warn!(error = %e, payload_len = text.len(), "Rejected provider payload");
        }
        result
    }
}

/// Map chat history onto provider turns, preserving order
pub fn to_contents(history: &[Message]) -> Vec<Content> {
    history
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => ContentRole::User,
                Role::Model => ContentRole::Model,
            };
            Content::text(role, msg.text.clone())
        })
        .collect()
}

/// Exact shape of the schema-constrained payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TurnPayload {
    reply: String,
    detected_language: String,
    english_translation: String,
    cultural_note: String,
    sentiment: Sentiment,
    suggested_responses: Vec<String>,
}

/// Strictly validate a provider payload. Missing fields, wrong types,
/// unknown fields and out-of-enum sentiments are all `MalformedResponse`.
pub fn parse_payload(text: &str) -> Result<TurnReply, TurnError> {
    if text.trim().is_empty() {
        return Err(TurnError::EmptyResponse);
    }

    let payload: TurnPayload =
        serde_json::from_str(text).map_err(|e| TurnError::MalformedResponse(e.to_string()))?;

    Ok(TurnReply {
        reply: payload.reply,
        insight: Insight {
            detected_language: payload.detected_language,
            english_translation: payload.english_translation,
            cultural_note: payload.cultural_note,
            sentiment: payload.sentiment,
            suggested_responses: payload.suggested_responses,
        },
    })
}
