use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sbaa_core::{AppError, AppResult, TenantId, UserIdentity};
use sbaa_domain::{
    AuditAction, AuthorizationDecision, AuthorizationSubject, Ownership, OwnershipGrant,
    OwnershipId, PrivilegeCode, PrivilegeSources, ResourcePath, Role, RoleId, RoleType,
};
use tokio::sync::Mutex;

use crate::{AuditEvent, AuditRepository};

use super::{AuthorizationRepository, AuthorizationService};

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuthorizationRepository {
    global_roles: HashMap<String, Role>,
    team_sources: HashMap<(TenantId, String), PrivilegeSources>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn load_privilege_sources(
        &self,
        subject: &str,
        tenant_id: Option<TenantId>,
    ) -> AppResult<PrivilegeSources> {
        let mut sources = tenant_id
            .and_then(|tenant_id| {
                self.team_sources
                    .get(&(tenant_id, subject.to_owned()))
                    .cloned()
            })
            .unwrap_or_default();
        sources.global_role = self.global_roles.get(subject).cloned();
        Ok(sources)
    }
}

fn role(role_type: RoleType, privileges: &[PrivilegeCode]) -> Role {
    match Role::new(
        RoleId::new(),
        "role",
        None,
        role_type,
        privileges.iter().copied(),
    ) {
        Ok(role) => role,
        Err(error) => panic!("test role should be valid: {error}"),
    }
}

fn ods_owner_sources(tenant_id: TenantId) -> PrivilegeSources {
    let owner_role = role(
        RoleType::ResourceOwnership,
        &[PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead],
    );
    let ownership = match Ownership::new(
        OwnershipId::new(),
        tenant_id,
        owner_role.id(),
        ResourcePath::ods(1, 2, 3),
        Utc::now(),
    ) {
        Ok(ownership) => ownership,
        Err(error) => panic!("test ownership should be valid: {error}"),
    };

    PrivilegeSources {
        global_role: None,
        membership_role: None,
        ownerships: vec![OwnershipGrant {
            ownership,
            role: owner_role,
        }],
    }
}

fn service(
    repository: FakeAuthorizationRepository,
) -> (AuthorizationService, Arc<FakeAuditRepository>) {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    (
        AuthorizationService::new(Arc::new(repository), audit_repository.clone()),
        audit_repository,
    )
}

fn alice() -> UserIdentity {
    UserIdentity::new("alice", "Alice", None)
}

#[tokio::test]
async fn require_privilege_allows_global_grant() {
    let (service, audit_repository) = service(FakeAuthorizationRepository {
        global_roles: HashMap::from([(
            "alice".to_owned(),
            role(RoleType::Global, &[PrivilegeCode::RoleRead]),
        )]),
        ..FakeAuthorizationRepository::default()
    });

    let result = service
        .require_privilege(
            &alice(),
            PrivilegeCode::RoleRead,
            &AuthorizationSubject::Global,
        )
        .await;

    assert!(result.is_ok());
    assert!(audit_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn require_privilege_denies_and_audits_missing_grant() {
    let tenant_id = TenantId::new();
    let (service, audit_repository) = service(FakeAuthorizationRepository::default());

    let result = service
        .require_privilege(
            &alice(),
            PrivilegeCode::TeamUserRead,
            &AuthorizationSubject::Team(tenant_id),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::SecurityAuthorizationDenied);
    assert_eq!(events[0].tenant_id, Some(tenant_id));
}

#[tokio::test]
async fn require_privilege_allows_inherited_read_from_ownership() {
    let tenant_id = TenantId::new();
    let (service, _) = service(FakeAuthorizationRepository {
        team_sources: HashMap::from([((tenant_id, "alice".to_owned()), ods_owner_sources(tenant_id))]),
        ..FakeAuthorizationRepository::default()
    });

    let result = service
        .require_privilege(
            &alice(),
            PrivilegeCode::TeamSbEnvironmentRead,
            &AuthorizationSubject::Resource {
                tenant_id,
                path: ResourcePath::sb_environment(1),
            },
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn require_privilege_fails_closed_on_collection_subject() {
    let tenant_id = TenantId::new();
    let (service, _) = service(FakeAuthorizationRepository {
        team_sources: HashMap::from([((tenant_id, "alice".to_owned()), ods_owner_sources(tenant_id))]),
        ..FakeAuthorizationRepository::default()
    });

    let result = service
        .require_privilege(
            &alice(),
            PrivilegeCode::TeamSbEnvironmentRead,
            &AuthorizationSubject::AnyInstance(tenant_id),
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn require_filter_returns_owned_paths() {
    let tenant_id = TenantId::new();
    let (service, _) = service(FakeAuthorizationRepository {
        team_sources: HashMap::from([((tenant_id, "alice".to_owned()), ods_owner_sources(tenant_id))]),
        ..FakeAuthorizationRepository::default()
    });

    let result = service
        .require_filter(&alice(), PrivilegeCode::TeamSbEnvironmentRead, tenant_id)
        .await;

    let Ok(filter) = result else {
        panic!("owner should receive a filter");
    };
    assert!(filter.permits(&ResourcePath::sb_environment(1)));
    assert!(!filter.permits(&ResourcePath::sb_environment(2)));
}

#[tokio::test]
async fn require_filter_denies_other_team() {
    let tenant_id = TenantId::new();
    let (service, audit_repository) = service(FakeAuthorizationRepository {
        team_sources: HashMap::from([((tenant_id, "alice".to_owned()), ods_owner_sources(tenant_id))]),
        ..FakeAuthorizationRepository::default()
    });

    let result = service
        .require_filter(&alice(), PrivilegeCode::TeamSbEnvironmentRead, TenantId::new())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(audit_repository.events.lock().await.len(), 1);
}

#[tokio::test]
async fn authorize_reports_malformed_subject_as_validation_error() {
    let (service, audit_repository) = service(FakeAuthorizationRepository::default());

    let result = service
        .authorize(
            &alice(),
            PrivilegeCode::TeamUserRead,
            &AuthorizationSubject::Global,
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(audit_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn authorize_returns_deny_as_a_value() {
    let (service, _) = service(FakeAuthorizationRepository::default());

    let result = service
        .authorize(
            &alice(),
            PrivilegeCode::OwnershipCreate,
            &AuthorizationSubject::Global,
        )
        .await;

    assert!(matches!(result, Ok(AuthorizationDecision::Deny)));
}
