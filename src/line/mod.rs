//! LINE Messaging API
//!
//! Webhook payload models and the reply client.

mod client;
mod webhook;

pub use client::{LineClient, Messenger, TextMessage, MAX_TEXT_LENGTH};
pub use webhook::{Event, MessageContent, MessageEvent, Source, TextContent, WebhookPayload};
