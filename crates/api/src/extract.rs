//! Request body extractor that deserializes JSON and runs `validator` rules.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its `#[validate(...)]` rules.
///
/// Malformed JSON or missing required fields reject with 400 `BAD_REQUEST`;
/// rule violations reject with 400 `VALIDATION_ERROR` and a per-field
/// `details` map.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateWound>) -> AppResult<Json<Wound>> {
///     // input satisfies every field rule here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
