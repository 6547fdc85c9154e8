use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sbaa_core::{AppError, UserIdentity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "user_identity";
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub subject: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub token: String,
}

/// Signs in with the bootstrap token and makes the subject a global admin.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let subject = payload.subject.trim().to_owned();
    if subject.is_empty() {
        return Err(AppError::Validation("subject must not be empty".to_owned()).into());
    }
    let display_name = payload
        .display_name
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| subject.clone());
    let identity = UserIdentity::new(subject, display_name, payload.email);

    state
        .security_admin_service
        .bootstrap_admin(&identity)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(subject = identity.subject(), "bootstrap sign-in");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the signed-in user and the global privileges they hold.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let privileges = state
        .authorization_service
        .effective_privileges(&identity, None)
        .await?;

    Ok(Json(UserIdentityResponse::new(&identity, &privileges)))
}
