use crate::dtos::ErrorResponse;
use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const MISSING_QUESTION_MESSAGE: &str = "Question is required.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to get a response from the AI.";

/// Failures surfaced by `POST /api/ask`.
///
/// The response body is always one of two fixed messages; upstream detail is
/// only ever logged.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Question is required")]
    MissingQuestion,

    #[error("Upstream error: {0}")]
    Upstream(#[from] ProviderError),
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AskError::MissingQuestion => (StatusCode::BAD_REQUEST, MISSING_QUESTION_MESSAGE),
            AskError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
