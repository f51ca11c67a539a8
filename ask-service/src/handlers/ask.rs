use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    dtos::{AskRequest, AskResponse},
    error::AskError,
    services::ProviderError,
    startup::AppState,
    utils::ValidatedJson,
};

/// Answer a question by relaying it verbatim to the text provider.
pub async fn ask(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AskRequest>,
) -> Result<Json<AskResponse>, AskError> {
    let question = match req.question {
        Some(Value::String(question)) => question,
        Some(other) => {
            let err = ProviderError::InvalidRequest(format!(
                "prompt must be a string, got {}",
                other
            ));
            tracing::error!(error = %err, "Failed to get a completion from the text provider");
            return Err(AskError::from(err));
        }
        None => return Err(AskError::MissingQuestion),
    };

    let answer = state.provider.complete(&question).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to get a completion from the text provider");
        AskError::from(e)
    })?;

    Ok(Json(AskResponse { answer }))
}
