use super::*;

pub async fn assign_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AssignMembershipRequest>,
) -> ApiResult<(StatusCode, Json<MembershipResponse>)> {
    let role_id = payload
        .role_id
        .as_deref()
        .map(RoleId::from_str)
        .transpose()?;

    let membership = state
        .security_admin_service
        .assign_membership(
            &user,
            AssignMembershipInput {
                tenant_id: TenantId::from_str(payload.team_id.as_str())?,
                subject: payload.subject,
                role_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MembershipResponse::from(membership))))
}

pub async fn remove_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RemoveMembershipRequest>,
) -> ApiResult<StatusCode> {
    let tenant_id = TenantId::from_str(payload.team_id.as_str())?;
    state
        .security_admin_service
        .remove_membership(&user, tenant_id, payload.subject.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_global_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
    Json(payload): Json<AssignGlobalRoleRequest>,
) -> ApiResult<StatusCode> {
    let role_id = payload
        .role_id
        .as_deref()
        .map(RoleId::from_str)
        .transpose()?;

    state
        .security_admin_service
        .assign_global_role(&user, subject.as_str(), role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
