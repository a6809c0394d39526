//! Authentication endpoints

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentSession;
use crate::models::{SafeUser, SessionMetadata, User};
use crate::state::AppState;
use crate::validation;

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for token refresh
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_login(&payload.email, &payload.password)
        .map_err(|e| ApiError::Validation(vec![e]))?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let metadata = SessionMetadata::new(user_agent, None);

    let (user, tokens) = state
        .session_service
        .login(&payload.email, &payload.password, metadata)
        .await?;

    Ok(Json(json!({
        "user": SafeUser::from(&user),
        "tokens": tokens,
    })))
}

/// Exchange a masked refresh token for a new masked access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let access_token = state
        .session_service
        .refresh_access_token(&payload.refresh_token)
        .await?;

    Ok(Json(json!({ "accessToken": access_token })))
}

/// Logout: revoke the current session.
///
/// Best-effort by contract: a failed revocation is logged but never blocks
/// the client from discarding its tokens.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> impl IntoResponse {
    if let Err(e) = state
        .session_service
        .revoke_session(&session.0.access_token_masked)
        .await
    {
        warn!("failed to revoke session {}: {e}", session.0.id);
    } else {
        info!("session {} revoked", session.0.id);
    }

    Json(json!({ "message": "Logged out successfully" }))
}

/// Logout from all devices: revoke every active session for the caller
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    let revoked = state
        .session_service
        .revoke_all_user_sessions(user.id)
        .await?;

    Ok(Json(json!({
        "message": "Logged out from all devices",
        "revokedSessions": revoked,
    })))
}
