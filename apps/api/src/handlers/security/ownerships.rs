use super::*;

pub async fn grant_ownership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<GrantOwnershipRequest>,
) -> ApiResult<(StatusCode, Json<OwnershipResponse>)> {
    let ownership = state
        .security_admin_service
        .grant_ownership(
            &user,
            GrantOwnershipInput {
                tenant_id: TenantId::from_str(payload.team_id.as_str())?,
                role_id: RoleId::from_str(payload.role_id.as_str())?,
                resource: ResourcePath::from_ids(payload.resource)?,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(OwnershipResponse::from(ownership))))
}

pub async fn revoke_ownership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(ownership_id): Path<String>,
) -> ApiResult<Json<OwnershipResponse>> {
    let ownership_id = OwnershipId::from_str(ownership_id.as_str())?;
    let ownership = state
        .security_admin_service
        .revoke_ownership(&user, ownership_id)
        .await?;

    Ok(Json(OwnershipResponse::from(ownership)))
}
