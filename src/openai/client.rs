use super::types::{
    AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    FunctionDefinition,
};
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info};

/// A chat model that may answer with a function call
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        functions: Option<&[FunctionDefinition]>,
    ) -> Result<AssistantMessage>;
}

pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http_client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        functions: Option<&[FunctionDefinition]>,
    ) -> Result<AssistantMessage> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            functions,
            function_call: functions.map(|_| "auto"),
        };

        debug!(
            "Sending chat completion: model={}, messages={}, functions={}",
            self.model,
            messages.len(),
            functions.map(|f| f.len()).unwrap_or(0)
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI request error: {}", e);
                BotError::OpenAi {
                    message: format!("Request failed: {}", e),
                    status_code: None,
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            error!("OpenAI API returned error status {}: {}", status, body);

            return Err(BotError::OpenAi {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status.as_u16()),
            });
        }

        let api_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenAI response: {}", e);
            BotError::OpenAi {
                message: format!("JSON parse error: {}", e),
                status_code: None,
            }
        })?;

        info!(
            "Chat completion finished in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        if let Some(usage) = &api_response.usage {
            debug!(
                "OpenAI usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| BotError::OpenAi {
                message: "No choices in OpenAI response".to_string(),
                status_code: None,
            })
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
