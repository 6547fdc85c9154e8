use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use sbaa_core::{TenantId, UserIdentity};

use crate::dto::{
    CreateTeamRequest, EffectivePrivilegesResponse, MembershipResponse, OwnershipResponse,
    SbEnvironmentResponse, TeamResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_teams_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let teams = state
        .security_admin_service
        .list_teams(&user)
        .await?
        .into_iter()
        .map(TeamResponse::from)
        .collect();

    Ok(Json(teams))
}

pub async fn create_team_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let team = state
        .security_admin_service
        .create_team(&user, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

pub async fn list_team_ownerships_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<OwnershipResponse>>> {
    let tenant_id = TenantId::from_str(team_id.as_str())?;
    let ownerships = state
        .security_admin_service
        .list_team_ownerships(&user, tenant_id)
        .await?
        .into_iter()
        .map(OwnershipResponse::from)
        .collect();

    Ok(Json(ownerships))
}

pub async fn list_team_memberships_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<MembershipResponse>>> {
    let tenant_id = TenantId::from_str(team_id.as_str())?;
    let memberships = state
        .security_admin_service
        .list_team_memberships(&user, tenant_id)
        .await?
        .into_iter()
        .map(MembershipResponse::from)
        .collect();

    Ok(Json(memberships))
}

pub async fn list_team_sb_environments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<SbEnvironmentResponse>>> {
    let tenant_id = TenantId::from_str(team_id.as_str())?;
    let environments = state
        .security_admin_service
        .list_visible_sb_environments(&user, tenant_id)
        .await?
        .into_iter()
        .map(SbEnvironmentResponse::from)
        .collect();

    Ok(Json(environments))
}

pub async fn get_team_sb_environment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((team_id, sb_environment_id)): Path<(String, i64)>,
) -> ApiResult<Json<SbEnvironmentResponse>> {
    let tenant_id = TenantId::from_str(team_id.as_str())?;
    let environment = state
        .security_admin_service
        .get_sb_environment(&user, tenant_id, sb_environment_id)
        .await?;

    Ok(Json(SbEnvironmentResponse::from(environment)))
}

/// Returns what the signed-in user holds in one team.
///
/// Not gated by a privilege: a user may always inspect their own grants.
pub async fn team_privileges_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<EffectivePrivilegesResponse>> {
    let tenant_id = TenantId::from_str(team_id.as_str())?;
    let privileges = state
        .authorization_service
        .effective_privileges(&user, Some(tenant_id))
        .await?;

    Ok(Json(EffectivePrivilegesResponse::new(
        tenant_id.to_string(),
        &privileges,
    )))
}
