use crate::error::{BotError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityQuery {
    Today,
    Tomorrow,
    Specific(NaiveDate),
}

impl AvailabilityQuery {
    pub fn command(&self) -> &'static str {
        match self {
            AvailabilityQuery::Today => "availability_today",
            AvailabilityQuery::Tomorrow => "availability_tomorrow",
            AvailabilityQuery::Specific(_) => "availability_specific",
        }
    }

    /// The script expects a LINE-shaped envelope around the command.
    pub fn payload(&self) -> Value {
        let mut message = json!({ "text": self.command() });
        if let AvailabilityQuery::Specific(date) = self {
            message["date"] = Value::String(date.format("%Y-%m-%d").to_string());
        }
        json!({ "events": [{ "message": message }] })
    }
}

#[async_trait]
pub trait AvailabilityBackend: Send + Sync {
    async fn fetch(&self, query: AvailabilityQuery) -> Result<Value>;
}

pub struct GasClient {
    http_client: Client,
    web_app_url: String,
}

impl GasClient {
    pub fn new(http_client: Client, web_app_url: String) -> Self {
        Self {
            http_client,
            web_app_url,
        }
    }
}

#[async_trait]
impl AvailabilityBackend for GasClient {
    async fn fetch(&self, query: AvailabilityQuery) -> Result<Value> {
        debug!("Requesting {} from Google Apps Script", query.command());

        let response = self
            .http_client
            .post(&self.web_app_url)
            .json(&query.payload())
            .send()
            .await
            .map_err(|e| {
                warn!("Google Apps Script request failed: {}", e);
                BotError::Availability {
                    message: format!("Google Apps Script request failed: {}", e),
                }
            })?;

        let status = response.status();
        if status.as_u16() != 200 {
            warn!("Google Apps Script returned status {}", status);
            return Err(BotError::Availability {
                message: format!(
                    "Google Apps Script returned status code {}",
                    status.as_u16()
                ),
            });
        }

        let body = response.text().await.map_err(|e| BotError::Availability {
            message: format!("Google Apps Script response unreadable: {}", e),
        })?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("Google Apps Script returned invalid JSON: {}", e);
            BotError::Availability {
                message: "Invalid JSON response from Google Apps Script.".to_string(),
            }
        })
    }
}

/// Render an availability result as the function message fed back to the model.
///
/// A JSON object carrying an `error` key counts as a failure, same as a
/// transport or status error.
pub fn render_for_model(result: &Result<Value>) -> String {
    match result {
        Err(err) => format!("Error: {}", err),
        Ok(Value::Object(map)) if map.contains_key("error") => match &map["error"] {
            Value::String(message) => format!("Error: {}", message),
            other => format!("Error: {}", other),
        },
        Ok(value) => value.to_string(),
    }
}
