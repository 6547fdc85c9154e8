use super::*;

pub async fn list_privileges_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PrivilegeResponse>>> {
    let privileges = state
        .security_admin_service
        .list_privileges(&user)
        .await?
        .iter()
        .map(PrivilegeResponse::from)
        .collect();

    Ok(Json(privileges))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let role = state
        .security_admin_service
        .get_role(&user, role_id)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let privileges = payload
        .privileges
        .iter()
        .map(|value| PrivilegeCode::from_transport(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let role = state
        .security_admin_service
        .create_role(
            &user,
            CreateRoleInput {
                name: payload.name,
                description: payload.description,
                role_type: RoleType::from_str(payload.role_type.as_str())?,
                privileges,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    state
        .security_admin_service
        .delete_role(&user, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
