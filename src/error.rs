use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Invalid webhook payload: {message}")]
    InvalidPayload { message: String },

    #[error("OpenAI request failed: {message}")]
    OpenAi {
        message: String,
        status_code: Option<u16>,
    },

    #[error("{message}")]
    Availability { message: String },

    #[error("LINE request failed: {message}")]
    Line {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            BotError::InvalidSignature => (StatusCode::BAD_REQUEST, "invalid_signature"),
            BotError::InvalidPayload { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_payload")
            }
            BotError::OpenAi { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "openai_failed"),
            BotError::Availability { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "availability_failed")
            }
            BotError::Line { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "line_failed"),
            BotError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::InvalidPayload {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Internal(format!("HTTP client error: {}", err))
    }
}

impl From<anyhow::Error> for BotError {
    fn from(err: anyhow::Error) -> Self {
        BotError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
