use std::sync::Arc;

use chrono::Utc;
use sbaa_application::{
    AssignMembershipInput, AuthorizationRepository, AuthorizationService, CreateRoleInput,
    GrantOwnershipInput, SecurityAdminRepository, SecurityAdminService, TeamDefinition,
};
use sbaa_core::{AppError, TenantId, UserIdentity};
use sbaa_domain::{
    AuditAction, AuthorizationDecision, AuthorizationSubject, Ownership, OwnershipId,
    PrivilegeCode, ResourcePath, Role, RoleId, RoleType,
};

use super::InMemorySecurityStore;

fn services(store: &Arc<InMemorySecurityStore>) -> (AuthorizationService, SecurityAdminService) {
    let authorization_service = AuthorizationService::new(store.clone(), store.clone());
    let security_admin_service =
        SecurityAdminService::new(authorization_service.clone(), store.clone(), store.clone());
    (authorization_service, security_admin_service)
}

fn admin() -> UserIdentity {
    UserIdentity::new("admin", "Admin", None)
}

fn member() -> UserIdentity {
    UserIdentity::new("member", "Member", None)
}

async fn create_role(
    service: &SecurityAdminService,
    name: &str,
    role_type: RoleType,
    privileges: Vec<PrivilegeCode>,
) -> Role {
    let result = service
        .create_role(
            &admin(),
            CreateRoleInput {
                name: name.to_owned(),
                description: None,
                role_type,
                privileges,
            },
        )
        .await;
    let Ok(role) = result else {
        panic!("role '{name}' should be created");
    };
    role
}

#[tokio::test]
async fn membership_read_on_owned_ods_reaches_environment_read() {
    let store = Arc::new(InMemorySecurityStore::new());
    store.insert_sb_environment(1, "Production").await;
    let (authorization, admin_service) = services(&store);
    assert!(admin_service.bootstrap_admin(&admin()).await.is_ok());
    assert!(admin_service.ensure_user(&member()).await.is_ok());

    let Ok(team) = admin_service.create_team(&admin(), "District").await else {
        panic!("team should be created");
    };
    let reader = create_role(
        &admin_service,
        "ODS reader",
        RoleType::UserTeam,
        vec![PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead],
    )
    .await;
    let owner = create_role(
        &admin_service,
        "ODS owner",
        RoleType::ResourceOwnership,
        vec![PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsDelete],
    )
    .await;

    let assigned = admin_service
        .assign_membership(
            &admin(),
            AssignMembershipInput {
                tenant_id: team.tenant_id,
                subject: "member".to_owned(),
                role_id: Some(reader.id()),
            },
        )
        .await;
    assert!(assigned.is_ok());
    let granted = admin_service
        .grant_ownership(
            &admin(),
            GrantOwnershipInput {
                tenant_id: team.tenant_id,
                role_id: owner.id(),
                resource: ResourcePath::ods(1, 2, 3),
            },
        )
        .await;
    assert!(granted.is_ok());

    let environment = AuthorizationSubject::Resource {
        tenant_id: team.tenant_id,
        path: ResourcePath::sb_environment(1),
    };
    assert!(matches!(
        authorization
            .authorize(&member(), PrivilegeCode::TeamSbEnvironmentRead, &environment)
            .await,
        Ok(AuthorizationDecision::Allow)
    ));

    let tenant = AuthorizationSubject::Resource {
        tenant_id: team.tenant_id,
        path: ResourcePath::edfi_tenant(1, 2),
    };
    assert!(matches!(
        authorization
            .authorize(
                &member(),
                PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsCreate,
                &tenant
            )
            .await,
        Ok(AuthorizationDecision::Deny)
    ));

    let visible = admin_service
        .list_visible_sb_environments(&member(), team.tenant_id)
        .await;
    assert!(matches!(visible, Ok(environments) if environments.len() == 1));
}

#[tokio::test]
async fn non_member_gets_no_team_privileges() {
    let store = Arc::new(InMemorySecurityStore::new());
    let tenant_id = TenantId::new();
    assert!(
        store
            .create_team(&TeamDefinition {
                tenant_id,
                name: "Team".to_owned(),
            })
            .await
            .is_ok()
    );
    let role = match Role::new(
        RoleId::new(),
        "Owner",
        None,
        RoleType::ResourceOwnership,
        [PrivilegeCode::TeamSbEnvironmentRead],
    ) {
        Ok(role) => role,
        Err(error) => panic!("role should be valid: {error}"),
    };
    assert!(store.create_role(&role).await.is_ok());
    let ownership = match Ownership::new(
        OwnershipId::new(),
        tenant_id,
        role.id(),
        ResourcePath::sb_environment(1),
        Utc::now(),
    ) {
        Ok(ownership) => ownership,
        Err(error) => panic!("ownership should be valid: {error}"),
    };
    assert!(store.create_ownership(&ownership).await.is_ok());

    let sources = store.load_privilege_sources("stranger", Some(tenant_id)).await;
    assert!(matches!(sources, Ok(sources) if sources.ownerships.is_empty()));

    let (authorization, _) = services(&store);
    let result = authorization
        .require_filter(
            &UserIdentity::new("stranger", "Stranger", None),
            PrivilegeCode::TeamSbEnvironmentRead,
            tenant_id,
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let events = store.audit_events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::SecurityAuthorizationDenied);
}

#[tokio::test]
async fn revoked_ownership_is_kept_but_inactive() {
    let store = Arc::new(InMemorySecurityStore::new());
    let tenant_id = TenantId::new();
    let role = match Role::new(
        RoleId::new(),
        "Owner",
        None,
        RoleType::ResourceOwnership,
        [PrivilegeCode::TeamSbEnvironmentRead],
    ) {
        Ok(role) => role,
        Err(error) => panic!("role should be valid: {error}"),
    };
    assert!(store.create_role(&role).await.is_ok());
    let ownership = match Ownership::new(
        OwnershipId::new(),
        tenant_id,
        role.id(),
        ResourcePath::sb_environment(4),
        Utc::now(),
    ) {
        Ok(ownership) => ownership,
        Err(error) => panic!("ownership should be valid: {error}"),
    };
    assert!(store.create_ownership(&ownership).await.is_ok());
    assert!(matches!(
        store.create_ownership(&ownership).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        store.delete_role(role.id()).await,
        Err(AppError::Conflict(_))
    ));

    assert!(store.revoke_ownership(ownership.id(), Utc::now()).await.is_ok());
    assert!(matches!(
        store.list_ownerships(tenant_id, false).await,
        Ok(active) if active.is_empty()
    ));
    assert!(matches!(
        store.list_ownerships(tenant_id, true).await,
        Ok(all) if all.len() == 1 && !all[0].is_active()
    ));
    assert!(store.delete_role(role.id()).await.is_ok());
}

#[tokio::test]
async fn duplicate_role_names_conflict() {
    let store = Arc::new(InMemorySecurityStore::new());
    let (_, admin_service) = services(&store);
    assert!(admin_service.bootstrap_admin(&admin()).await.is_ok());

    create_role(&admin_service, "Viewer", RoleType::UserTeam, Vec::new()).await;
    let duplicate = admin_service
        .create_role(
            &admin(),
            CreateRoleInput {
                name: "Viewer".to_owned(),
                description: None,
                role_type: RoleType::Global,
                privileges: Vec::new(),
            },
        )
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}
