//! Golf bay availability bot for the LINE Messaging API
//!
//! Receives LINE webhooks, answers with an OpenAI chat model that can call
//! availability lookups served by a Google Apps Script web app.

pub mod api;
pub mod assistant;
pub mod availability;
pub mod config;
pub mod error;
pub mod line;
pub mod openai;
pub mod security;

#[cfg(test)]
mod test_support;
