//! Request-level errors for the chat endpoints.
//!
//! Validation failures map to 400 with a fixed `error` string. Anything else
//! is a 500 carrying a generic `error` plus the underlying text in `message`.

use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::history::HistoryError;

pub const PROCESSING_FAILED: &str = "Failed to process message";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message field is required")]
    MissingMessage,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ChatError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::MissingMessage | ChatError::EmptyMessage)
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if self.is_validation() {
            json!({ "error": self.to_string() })
        } else {
            error!("Error: {}", self);
            json!({ "error": PROCESSING_FAILED, "message": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}
