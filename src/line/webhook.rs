use serde::Deserialize;

/// Body of a webhook delivery
///
/// LINE sends an empty `events` array when the webhook URL is verified
/// from the console.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Message(MessageEvent),
    /// follow, unfollow, postback, join and anything added later
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Absent for events delivered while the channel is in standby mode
    #[serde(default)]
    pub reply_token: Option<String>,
    pub source: Source,
    #[serde(default)]
    pub timestamp: i64,
    pub message: MessageContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text(TextContent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Source {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "userId", default)]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId", default)]
        user_id: Option<String>,
    },
}

impl Source {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Source::User { user_id } => Some(user_id),
            Source::Group { user_id, .. } | Source::Room { user_id, .. } => user_id.as_deref(),
        }
    }
}

impl MessageEvent {
    /// Text of the message, if it is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.message {
            MessageContent::Text(content) => Some(&content.text),
            MessageContent::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_message_event() {
        let body = r#"{
            "destination": "Uxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
            "events": [{
                "type": "message",
                "message": {"type": "text", "id": "14353798921116", "text": "Is bay 3 free today?"},
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "deliveryContext": {"isRedelivery": false},
                "timestamp": 1625665242211,
                "source": {"type": "user", "userId": "U80696558e1aa831ae6c2ad4f7d1d8a8b"},
                "replyToken": "757913772c4646b784d4b7ce46d12671",
                "mode": "active"
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.events.len(), 1);

        let Event::Message(event) = &payload.events[0] else {
            panic!("expected message event");
        };
        assert_eq!(
            event.reply_token.as_deref(),
            Some("757913772c4646b784d4b7ce46d12671")
        );
        assert_eq!(event.timestamp, 1625665242211);
        assert_eq!(event.text(), Some("Is bay 3 free today?"));
        assert_eq!(
            event.source.user_id(),
            Some("U80696558e1aa831ae6c2ad4f7d1d8a8b")
        );
    }

    #[test]
    fn test_unknown_event_and_message_types_are_tolerated() {
        let body = r#"{
            "events": [
                {"type": "follow", "replyToken": "r1", "source": {"type": "user", "userId": "U1"}},
                {"type": "message", "replyToken": "r2",
                 "source": {"type": "group", "groupId": "C1"},
                 "message": {"type": "sticker", "id": "1", "packageId": "446", "stickerId": "1988"}}
            ]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert!(matches!(payload.events[0], Event::Other));

        let Event::Message(event) = &payload.events[1] else {
            panic!("expected message event");
        };
        assert!(event.text().is_none());
        assert!(event.source.user_id().is_none());
    }

    #[test]
    fn test_verification_ping_has_no_events() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"destination":"U0","events":[]}"#).unwrap();
        assert!(payload.events.is_empty());
        assert_eq!(payload.destination.as_deref(), Some("U0"));
    }

    #[test]
    fn test_standby_event_without_reply_token() {
        let body = r#"{
            "events": [{
                "type": "message",
                "mode": "standby",
                "timestamp": 1625665242211,
                "source": {"type": "user", "userId": "U1"},
                "message": {"type": "text", "id": "2", "text": "hello"}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        let Event::Message(event) = &payload.events[0] else {
            panic!("expected message event");
        };
        assert!(event.reply_token.is_none());
        assert_eq!(event.text(), Some("hello"));
    }

    #[test]
    fn test_room_source_user_id() {
        let source: Source =
            serde_json::from_str(r#"{"type":"room","roomId":"R1","userId":"U9"}"#).unwrap();
        assert_eq!(source.user_id(), Some("U9"));
    }
}
