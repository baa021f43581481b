//! Voice onboarding endpoint

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::post,
};
use serde_json::Value;

use super::error::{ApiError, method_not_allowed};
use crate::onboarding::{UserProfile, extract};

const TRANSCRIPT_REQUIRED: &str = "Transcript is required";
const NAME_NOT_FOUND: &str = "Could not extract name from transcript";

/// Build onboarding router
pub fn router() -> Router {
    Router::new().route("/voice", post(voice).fallback(method_not_allowed))
}

/// Create a profile from a spoken introduction
async fn voice(payload: Result<Json<Value>, JsonRejection>) -> Result<Json<UserProfile>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!(error = %e, "unreadable onboarding payload");
        ApiError::BadRequest(TRANSCRIPT_REQUIRED)
    })?;

    let transcript = body
        .get("transcript")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::BadRequest(TRANSCRIPT_REQUIRED))?;

    let Some(extraction) = extract(transcript) else {
        tracing::info!(transcript_len = transcript.len(), "no name in transcript");
        return Err(ApiError::BadRequest(NAME_NOT_FOUND));
    };

    let profile = UserProfile::from_voice(&extraction.name);
    tracing::info!(
        id = %profile.id,
        name = %profile.name,
        strategy = ?extraction.strategy,
        "voice onboarding complete"
    );
    Ok(Json(profile))
}
