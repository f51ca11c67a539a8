use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AskError;

/// JSON body that has been deserialized and validated.
///
/// Any body that cannot be read as the expected shape is treated the same as
/// one that fails validation: the required input is missing.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AskError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected unreadable request body");
            AskError::MissingQuestion
        })?;

        value.validate().map_err(|e| {
            tracing::debug!(error = %e, "Rejected invalid request body");
            AskError::MissingQuestion
        })?;

        Ok(ValidatedJson(value))
    }
}
