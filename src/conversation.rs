//! Conversation data model and state container

mod insight;
mod message;
mod store;

pub use insight::{Insight, Sentiment};
pub use message::{Message, Role};
pub use store::{ConversationEvent, ConversationSnapshot, ConversationStore};
