//! User XP endpoint

use axum::{
    Json, Router,
    extract::{Path, rejection::JsonRejection},
    routing::put,
};
use serde_json::Value;

use super::error::{ApiError, method_not_allowed};
use crate::onboarding::{UserProfile, XpUpdate, is_valid_phone};

/// Build users router
pub fn router() -> Router {
    Router::new().route("/{id}/xp", put(update_xp).fallback(method_not_allowed))
}

/// Recompute level and achievements after an XP change
async fn update_xp(
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("Invalid user ID"));
    }

    let Json(body) = payload.map_err(|e| {
        tracing::debug!(error = %e, "unreadable xp payload");
        ApiError::BadRequest("XP must be a number")
    })?;

    let update = parse_update(&body)?;
    let delta = update.delta;
    let has_phone = update.phone.is_some();

    let profile = UserProfile::from_xp_update(&id, update)
        .ok_or(ApiError::BadRequest("XP total cannot be negative"))?;

    tracing::info!(
        id = %id,
        delta,
        level = profile.level.level,
        phone = has_phone,
        "xp updated"
    );
    Ok(Json(profile))
}

fn parse_update(body: &Value) -> Result<XpUpdate, ApiError> {
    let xp = body
        .get("xp")
        .filter(|v| v.is_number())
        .ok_or(ApiError::BadRequest("XP must be a number"))?;
    let delta = whole_number(xp).ok_or(ApiError::BadRequest("XP must be a whole number"))?;

    let phone = match body.get("phone") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) if is_valid_phone(s) => Some(s.clone()),
        Some(_) => return Err(ApiError::BadRequest("Invalid phone number format")),
    };

    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(String::from);

    Ok(XpUpdate { delta, phone, name })
}

/// Integral JSON number as `i64`; accepts float forms such as `60.0`
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&f);
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}
