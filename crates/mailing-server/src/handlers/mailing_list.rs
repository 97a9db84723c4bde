//! Mailing list signup handler

use super::ApiError;
use crate::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use mailing_core::SignupRecord;
use tracing::info;

/// `POST /mailing_list`
///
/// The body is decoded by hand rather than through the `Json` extractor so
/// that a missing `Content-Type` is accepted and decode failures use the same
/// error envelope as everything else.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SignupRecord>), ApiError> {
    let input = decode_signup(&body)?;

    let record = state.signup_service.handle_create(input).await?;
    info!("Signup accepted for: {}", record.email);

    Ok((StatusCode::CREATED, Json(record)))
}

/// Decode the first JSON value in the body. Anything after it is ignored and
/// a top-level `null` decodes as an empty record.
fn decode_signup(body: &[u8]) -> Result<SignupRecord, ApiError> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<SignupRecord>>();

    match values.next() {
        None => Err(ApiError::bad_request("request body is empty")),
        Some(Ok(record)) => Ok(record.unwrap_or_default()),
        Some(Err(e)) => Err(ApiError::bad_request(format!("invalid JSON: {}", e))),
    }
}
