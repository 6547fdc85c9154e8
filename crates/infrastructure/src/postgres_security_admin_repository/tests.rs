use chrono::Utc;
use sbaa_application::{
    AuthorizationRepository, SecurityAdminRepository, TeamDefinition, TenantMembership,
};
use sbaa_core::{AppError, TenantId, UserIdentity};
use sbaa_domain::{Ownership, OwnershipId, PrivilegeCode, ResourcePath, Role, RoleId, RoleType};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::PostgresAuthorizationRepository;

use super::PostgresSecurityAdminRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres security admin tests: {error}");
    }

    Some(pool)
}

fn unique_role(role_type: RoleType, privileges: &[PrivilegeCode]) -> Role {
    let role_id = RoleId::new();
    match Role::new(
        role_id,
        format!("role {role_id}"),
        None,
        role_type,
        privileges.iter().copied(),
    ) {
        Ok(role) => role,
        Err(error) => panic!("test role should be valid: {error}"),
    }
}

async fn create_team(repository: &PostgresSecurityAdminRepository) -> TenantId {
    let tenant_id = TenantId::new();
    let created = repository
        .create_team(&TeamDefinition {
            tenant_id,
            name: "Security Team".to_owned(),
        })
        .await;
    assert!(created.is_ok());
    tenant_id
}

fn ownership(tenant_id: TenantId, role: &Role, resource: ResourcePath) -> Ownership {
    match Ownership::new(OwnershipId::new(), tenant_id, role.id(), resource, Utc::now()) {
        Ok(ownership) => ownership,
        Err(error) => panic!("test ownership should be valid: {error}"),
    }
}

#[tokio::test]
async fn role_privileges_roundtrip_and_duplicate_names_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSecurityAdminRepository::new(pool);
    let role = unique_role(
        RoleType::UserTeam,
        &[
            PrivilegeCode::TeamUserRead,
            PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead,
        ],
    );

    assert!(repository.create_role(&role).await.is_ok());
    assert!(matches!(
        repository.find_role(role.id()).await,
        Ok(Some(stored)) if stored == role
    ));

    let duplicate = match Role::new(RoleId::new(), role.name(), None, RoleType::Global, []) {
        Ok(duplicate) => duplicate,
        Err(error) => panic!("duplicate role should be valid: {error}"),
    };
    assert!(matches!(
        repository.create_role(&duplicate).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn active_ownership_is_unique_per_resource_until_revoked() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSecurityAdminRepository::new(pool);
    let tenant_id = create_team(&repository).await;
    let role = unique_role(
        RoleType::ResourceOwnership,
        &[PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead],
    );
    assert!(repository.create_role(&role).await.is_ok());

    let first = ownership(tenant_id, &role, ResourcePath::ods(1, 2, 3));
    assert!(repository.create_ownership(&first).await.is_ok());

    let second = ownership(tenant_id, &role, ResourcePath::ods(1, 2, 3));
    assert!(matches!(
        repository.create_ownership(&second).await,
        Err(AppError::Conflict(_))
    ));

    assert!(repository.revoke_ownership(first.id(), Utc::now()).await.is_ok());
    assert!(matches!(
        repository.revoke_ownership(first.id(), Utc::now()).await,
        Err(AppError::Conflict(_))
    ));
    assert!(repository.create_ownership(&second).await.is_ok());

    let active = repository.list_ownerships(tenant_id, false).await;
    assert!(matches!(&active, Ok(rows) if rows.len() == 1 && rows[0].id() == second.id()));
    let all = repository.list_ownerships(tenant_id, true).await;
    assert!(matches!(&all, Ok(rows) if rows.len() == 2));
}

#[tokio::test]
async fn role_in_use_cannot_be_deleted() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSecurityAdminRepository::new(pool);
    let tenant_id = create_team(&repository).await;
    let role = unique_role(
        RoleType::ResourceOwnership,
        &[PrivilegeCode::TeamSbEnvironmentRead],
    );
    assert!(repository.create_role(&role).await.is_ok());
    let granted = ownership(tenant_id, &role, ResourcePath::sb_environment(5));
    assert!(repository.create_ownership(&granted).await.is_ok());

    assert!(matches!(
        repository.delete_role(role.id()).await,
        Err(AppError::Conflict(_))
    ));

    assert!(repository.revoke_ownership(granted.id(), Utc::now()).await.is_ok());
    assert!(repository.delete_role(role.id()).await.is_ok());
    assert!(matches!(repository.find_role(role.id()).await, Ok(None)));
}

#[tokio::test]
async fn privilege_sources_require_membership() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSecurityAdminRepository::new(pool.clone());
    let authorization = PostgresAuthorizationRepository::new(pool);
    let tenant_id = create_team(&repository).await;
    let subject = format!("user-{}", TenantId::new());
    let identity = UserIdentity::new(subject.clone(), "Member", None);
    assert!(repository.ensure_user(&identity).await.is_ok());

    let owner_role = unique_role(
        RoleType::ResourceOwnership,
        &[PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead],
    );
    assert!(repository.create_role(&owner_role).await.is_ok());
    let granted = ownership(tenant_id, &owner_role, ResourcePath::ods(7, 8, 9));
    assert!(repository.create_ownership(&granted).await.is_ok());

    let outsider = authorization
        .load_privilege_sources(&subject, Some(tenant_id))
        .await;
    assert!(matches!(&outsider, Ok(sources) if sources.ownerships.is_empty()));

    assert!(
        repository
            .upsert_membership(&TenantMembership {
                tenant_id,
                subject: subject.clone(),
                role_id: None,
            })
            .await
            .is_ok()
    );

    let member = authorization
        .load_privilege_sources(&subject, Some(tenant_id))
        .await;
    let Ok(member) = member else {
        panic!("member sources should load");
    };
    assert_eq!(member.ownerships.len(), 1);
    assert_eq!(member.ownerships[0].role, owner_role);
    assert!(member.membership_role.is_none());
}
