//! Common types for provider interactions

use serde::{Deserialize, Serialize};

/// MIME type requesting schema-constrained JSON output
pub const JSON_MIME_TYPE: &str = "application/json";

/// Structured generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub contents: Vec<Content>,
    pub response_mime_type: String,
    /// Object schema the provider must constrain its output to
    pub response_schema: serde_json::Value,
}

/// Speaker of a provider turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

/// One conversational turn in the provider's format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: ContentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    #[cfg(test)]
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Provider response, before any schema validation
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Raw payload text; `None` when the provider returned no candidate text
    pub text: Option<String>,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
