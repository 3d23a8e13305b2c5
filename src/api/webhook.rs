use crate::assistant::Assistant;
use crate::error::{BotError, Result};
use crate::line::{Event, MessageEvent, Messenger, TextMessage, WebhookPayload};
use crate::security::{verify_signature, SIGNATURE_HEADER};
use axum::{body::Bytes, extract::State, http::HeaderMap};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

pub struct AppState {
    pub assistant: Assistant,
    pub messenger: Arc<dyn Messenger>,
    pub channel_secret: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(assistant: Assistant, messenger: Arc<dyn Messenger>, channel_secret: String) -> Self {
        Self {
            assistant,
            messenger,
            channel_secret,
            started_at: Instant::now(),
        }
    }
}

/// LINE webhook endpoint
///
/// Events are answered in order before responding. A failed reply does not
/// stop later events; the first failure is returned once all are handled.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    debug!("Webhook body: {}", String::from_utf8_lossy(&body));

    verify_signature(&state.channel_secret, &body, signature)?;

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse webhook payload: {}", e);
        BotError::from(e)
    })?;

    if payload.events.is_empty() {
        info!("Webhook verification request received");
        return Ok("OK");
    }

    let mut first_error = None;

    for event in &payload.events {
        let Event::Message(event) = event else {
            debug!("Skipping non-message event");
            continue;
        };

        if let Err(e) = handle_message(&state, event).await {
            error!("Failed to handle message event: {}", e);
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok("OK"),
    }
}

async fn handle_message(state: &AppState, event: &MessageEvent) -> Result<()> {
    let Some(text) = event.text() else {
        debug!("Skipping non-text message");
        return Ok(());
    };

    let Some(reply_token) = event.reply_token.as_deref() else {
        debug!("Skipping message without reply token (standby mode)");
        return Ok(());
    };

    info!(
        "User ID: {}, Message: {}",
        event.source.user_id().unwrap_or("<unknown>"),
        text.trim()
    );

    let today = Local::now().date_naive();
    let reply = state.assistant.respond(text, today).await;

    state
        .messenger
        .reply(reply_token, &[TextMessage::new(reply)])
        .await
}
