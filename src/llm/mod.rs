pub mod client;

pub use client::types::prompt_chars;
pub use client::{ChatMessage, LLMClient, LanguageModel, Role};
