//! Conversation engine
//!
//! Turns one user message into one reply: ask the model, run the
//! availability lookup it requests, then ask the model again with the result.

mod engine;
mod prompt;
mod tool;

pub use engine::{replies, Assistant};
pub use prompt::{availability_functions, system_prompt};
pub use tool::{ToolRequest, ToolResolution};
