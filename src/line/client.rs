use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

/// LINE rejects text messages longer than this many characters.
pub const MAX_TEXT_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let text = if text.chars().count() > MAX_TEXT_LENGTH {
            text.chars().take(MAX_TEXT_LENGTH).collect()
        } else {
            text
        };

        Self { kind: "text", text }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [TextMessage],
}

/// Sends replies back to LINE users
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn reply(&self, reply_token: &str, messages: &[TextMessage]) -> Result<()>;
}

pub struct LineClient {
    http_client: Client,
    base_url: String,
    access_token: String,
}

impl LineClient {
    pub fn new(http_client: Client, base_url: String, access_token: String) -> Self {
        Self {
            http_client,
            base_url,
            access_token,
        }
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(&self, reply_token: &str, messages: &[TextMessage]) -> Result<()> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);

        debug!("Replying with {} message(s)", messages.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await
            .map_err(|e| BotError::Line {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            error!("LINE reply API returned error status {}: {}", status, body);

            return Err(BotError::Line {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status.as_u16()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{authorization, serve, Captured};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn test_text_message_serialization() {
        let request = ReplyRequest {
            reply_token: "token-1",
            messages: &[TextMessage::new("Bay 2 is free at 10:00")],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "replyToken": "token-1",
                "messages": [{"type": "text", "text": "Bay 2 is free at 10:00"}]
            })
        );
    }

    #[test]
    fn test_long_text_truncated_by_chars() {
        let long = "あ".repeat(MAX_TEXT_LENGTH + 10);
        let message = TextMessage::new(long);
        assert_eq!(message.text.chars().count(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(TextMessage::new("ok").text, "ok");
    }

    fn stub(status: StatusCode, captured: Captured) -> Router {
        Router::new().route(
            "/v2/bot/message/reply",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.record(authorization(&headers), body);
                    (status, Json(json!({"message": "stub"})))
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_reply_sends_bearer_token_and_body() {
        let captured = Captured::default();
        let base = serve(stub(StatusCode::OK, captured.clone())).await;
        let client = LineClient::new(Client::new(), base, "line-token".to_string());

        client
            .reply("tok-9", &[TextMessage::new("Bay 4 is free")])
            .await
            .unwrap();

        assert_eq!(captured.authorization().as_deref(), Some("Bearer line-token"));
        assert_eq!(
            captured.body(),
            json!({"replyToken": "tok-9", "messages": [{"type": "text", "text": "Bay 4 is free"}]})
        );
    }

    #[tokio::test]
    async fn test_reply_error_status_maps_to_line_error() {
        let base = serve(stub(StatusCode::BAD_REQUEST, Captured::default())).await;
        let client = LineClient::new(Client::new(), base, "line-token".to_string());

        let err = client
            .reply("expired", &[TextMessage::new("hi")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BotError::Line {
                status_code: Some(400),
                ..
            }
        ));
    }
}
