//! Assistant personas
//!
//! A persona is a configuration profile of the orchestrator: it supplies the
//! system instruction, the semantics of the insight fields (through the
//! schema descriptions) and the welcome-screen starter prompts. Exactly one
//! persona is active per deployment.

use crate::conversation::Sentiment;
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;

const CULTURAL_INSTRUCTION: &str = "You are Salom AI, a polite, knowledgeable, and multilingual cultural assistant. Your goal is to facilitate connection through language. When a user speaks to you, identify their language, translate it, provide a relevant cultural tidbit, and respond warmly. If the input is 'salomsalom', recognize it as a playful or emphatic Uzbek/Tajik greeting.";

const ASSISTANT_INSTRUCTION: &str = "You are Salom AI, a friendly and capable general-purpose assistant. Answer questions, write and explain code, explain complex topics simply, and help with everyday tasks. Format replies with Markdown (lists, code blocks, tables, links) when it improves readability. Always reply in the same language the user wrote in.";

/// Welcome-screen prompt: a short label and the text it submits
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Starter {
    pub label: &'static str,
    pub prompt: &'static str,
}

const CULTURAL_STARTERS: &[Starter] = &[
    Starter {
        label: "Greet in Uzbek",
        prompt: "Salom salom!",
    },
    Starter {
        label: "Chat in Uzbek",
        prompt: "Salom! Ishlar qalay?",
    },
    Starter {
        label: "Say thanks in Japanese",
        prompt: "どうもありがとうございます",
    },
    Starter {
        label: "Ask in Spanish",
        prompt: "¿Qué tal tu día?",
    },
];

const ASSISTANT_STARTERS: &[Starter] = &[
    Starter {
        label: "Write Code",
        prompt: "Write a Javascript function to reverse a string.",
    },
    Starter {
        label: "Explain Science",
        prompt: "Explain Quantum Entanglement simply.",
    },
    Starter {
        label: "Chat in Uzbek",
        prompt: "Salom! Ishlar qalay?",
    },
    Starter {
        label: "Cooking Ideas",
        prompt: "Give me a recipe for Italian Pasta.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Language and culture companion
    #[default]
    Cultural,
    /// General-purpose assistant
    Assistant,
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cultural" | "culture" => Ok(Self::Cultural),
            "assistant" | "general" => Ok(Self::Assistant),
            other => Err(format!(
                "unknown persona '{other}' (expected 'cultural' or 'assistant')"
            )),
        }
    }
}

impl Persona {
    pub fn id(self) -> &'static str {
        match self {
            Self::Cultural => "cultural",
            Self::Assistant => "assistant",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cultural => "Salom AI - Cultural Companion",
            Self::Assistant => "Salom AI",
        }
    }

    pub fn system_instruction(self) -> &'static str {
        match self {
            Self::Cultural => CULTURAL_INSTRUCTION,
            Self::Assistant => ASSISTANT_INSTRUCTION,
        }
    }

    pub fn starters(self) -> &'static [Starter] {
        match self {
            Self::Cultural => CULTURAL_STARTERS,
            Self::Assistant => ASSISTANT_STARTERS,
        }
    }

    fn reply_description(self) -> &'static str {
        match self {
            Self::Cultural => "A natural, friendly, and conversational response to the user's input in the same language as the input.",
            Self::Assistant => "A helpful, well-structured response to the user's input, formatted in Markdown, in the same language as the input.",
        }
    }

    fn translation_description(self) -> &'static str {
        match self {
            Self::Cultural => "The English translation of the user's input.",
            Self::Assistant => "The English translation of the user's input, or the input itself if it is already in English.",
        }
    }

    fn note_description(self) -> &'static str {
        match self {
            Self::Cultural => "A brief, interesting cultural fact related to the language, the specific greeting used, or the region where it is spoken.",
            Self::Assistant => "A brief cultural or technical note relevant to the topic of the user's message.",
        }
    }

    /// Object schema the provider must constrain its output to
    pub fn response_schema(self) -> Value {
        let sentiments = Sentiment::ALL.map(Sentiment::as_str);
        json!({
            "type": "OBJECT",
            "properties": {
                "reply": {
                    "type": "STRING",
                    "description": self.reply_description(),
                },
                "detectedLanguage": {
                    "type": "STRING",
                    "description": "The name of the language detected from the user's input.",
                },
                "englishTranslation": {
                    "type": "STRING",
                    "description": self.translation_description(),
                },
                "culturalNote": {
                    "type": "STRING",
                    "description": self.note_description(),
                },
                "sentiment": {
                    "type": "STRING",
                    "enum": sentiments,
                    "description": "The sentiment of the user's message.",
                },
                "suggestedResponses": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "3 short suggested follow-up responses the user might want to say next (in the detected language).",
                },
            },
            "required": [
                "reply",
                "detectedLanguage",
                "englishTranslation",
                "culturalNote",
                "sentiment",
                "suggestedResponses",
            ],
        })
    }
}
