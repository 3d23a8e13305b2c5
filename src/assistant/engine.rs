use super::prompt::{availability_functions, system_prompt};
use super::tool::{ToolRequest, ToolResolution};
use crate::availability::{render_for_model, AvailabilityBackend};
use crate::openai::{ChatMessage, ChatModel, FunctionDefinition};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed replies sent when the model cannot produce one.
pub mod replies {
    pub const PROCESSING_ERROR: &str =
        "Sorry, I encountered an error while processing your request.";
    pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that.";
    pub const UNSUPPORTED_REQUEST: &str = "I'm sorry, I can't handle that request right now.";
    pub const ASK_FOR_DATE: &str =
        "Please specify the date you want to check availability for (YYYY-MM-DD).";
    pub const INVALID_DATE: &str = "Please provide a valid date in YYYY-MM-DD format.";
}

pub struct Assistant {
    model: Arc<dyn ChatModel>,
    availability: Arc<dyn AvailabilityBackend>,
    functions: Vec<FunctionDefinition>,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>, availability: Arc<dyn AvailabilityBackend>) -> Self {
        Self {
            model,
            availability,
            functions: availability_functions(),
        }
    }

    /// Produce the reply for one user message. Never fails: every error
    /// becomes a user-facing apology.
    pub async fn respond(&self, text: &str, today: NaiveDate) -> String {
        let mut messages = vec![
            ChatMessage::system(system_prompt(today)),
            ChatMessage::user(text.trim()),
        ];

        let first = match self.model.complete(&messages, Some(self.functions.as_slice())).await {
            Ok(message) => message,
            Err(e) => {
                warn!("OpenAI API error: {}", e);
                return replies::PROCESSING_ERROR.to_string();
            }
        };

        let Some(mut call) = first.function_call else {
            return non_empty(first.content).unwrap_or_else(|| replies::NOT_UNDERSTOOD.to_string());
        };

        if call.arguments.trim().is_empty() {
            call.arguments = "{}".to_string();
        }

        info!("Model requested function {}({})", call.name, call.arguments);

        let query = match ToolRequest::resolve(&call) {
            ToolResolution::Run(ToolRequest::Availability(query)) => query,
            ToolResolution::MissingDate => return replies::ASK_FOR_DATE.to_string(),
            ToolResolution::InvalidDate(date) => {
                debug!("Rejecting unparsable date {:?}", date);
                return replies::INVALID_DATE.to_string();
            }
            ToolResolution::Unknown(name) => {
                warn!("Model requested unknown function {}", name);
                return replies::UNSUPPORTED_REQUEST.to_string();
            }
        };

        let result = self.availability.fetch(query).await;
        let rendered = render_for_model(&result);
        debug!("Availability result for model: {}", rendered);

        let name = call.name.clone();
        messages.push(ChatMessage::assistant_function_call(call));
        messages.push(ChatMessage::function_result(name, rendered));

        match self.model.complete(&messages, None).await {
            Ok(message) => {
                non_empty(message.content).unwrap_or_else(|| replies::NOT_UNDERSTOOD.to_string())
            }
            Err(e) => {
                warn!("OpenAI API error during second call: {}", e);
                replies::PROCESSING_ERROR.to_string()
            }
        }
    }
}

fn non_empty(content: Option<String>) -> Option<String> {
    content.filter(|c| !c.trim().is_empty())
}
