//! OpenAI Chat Completions with function calling

mod client;
mod types;

pub use client::{ChatModel, OpenAiClient};
pub use types::{AssistantMessage, ChatMessage, FunctionCall, FunctionDefinition};
