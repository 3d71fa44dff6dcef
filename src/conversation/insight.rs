//! Side-panel insight attached to the latest model reply

use serde::{Deserialize, Serialize};

/// Tone of the user's message as judged by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Structured data accompanying a model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub detected_language: String,
    pub english_translation: String,
    pub cultural_note: String,
    pub sentiment: Sentiment,
    pub suggested_responses: Vec<String>,
}

impl Insight {
    /// Suggestion at `index`, if the insight offered that many
    pub fn suggestion(&self, index: usize) -> Option<&str> {
        self.suggested_responses.get(index).map(String::as_str)
    }
}
