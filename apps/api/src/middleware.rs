use axum::Extension;
use axum::extract::{MatchedPath, RawPathParams, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use sbaa_core::{AppError, UserIdentity};
use sbaa_domain::AuthorizationDecision;
use tower_sessions::Session;
use tracing::error;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Checks the matched route's declared privilege before the handler runs.
///
/// A route without a declared policy is rejected.
pub async fn authorize_route(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    matched_path: MatchedPath,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let method = request.method().as_str().to_owned();
    let Some(policy) = state
        .route_policies
        .lookup(method.as_str(), matched_path.as_str())
    else {
        error!(
            method = method.as_str(),
            route = matched_path.as_str(),
            "route has no authorization policy"
        );
        return Err(AppError::Forbidden(format!(
            "route {method} {} has no authorization policy",
            matched_path.as_str()
        ))
        .into());
    };

    let subject = policy.resolve_subject(params.iter())?;
    let decision = state
        .authorization_service
        .authorize(&user, policy.privilege(), &subject)
        .await?;

    if decision == AuthorizationDecision::Deny {
        return Err(AppError::Forbidden(format!(
            "missing privilege '{}' for '{subject}'",
            policy.privilege().as_str()
        ))
        .into());
    }

    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let origin_is_allowed = origin == state.frontend_url;
        let referer_is_allowed = referer == state.frontend_url
            || referer.starts_with(&format!("{}/", state.frontend_url));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
