use axum::{extract::rejection::JsonRejection, http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::{completion::LlmError, models::ErrorBody};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid product input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Could not render listing: {0}")]
    Export(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Llm(_) | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "❌ Request failed");
        } else {
            tracing::warn!(error = %self, "⚠️ Request rejected");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
