use std::sync::Arc;

use sbaa_core::{AppError, AppResult, TenantId, UserIdentity};
use sbaa_domain::{AuditAction, AuthorizationSubject, PrivilegeCode, Role, RoleId, RoleType};

use crate::security_admin_ports::SecurityAdminRepository;
use crate::{AuditEvent, AuditRepository, AuthorizationService};

mod bootstrap;
mod environments;
mod memberships;
mod ownerships;
mod roles;
mod teams;


/// Name of the global role granted by the first-run bootstrap.
pub const GLOBAL_ADMIN_ROLE_NAME: &str = "Global admin";

/// Application service for role, ownership and membership administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    async fn require_global(&self, actor: &UserIdentity, privilege: PrivilegeCode) -> AppResult<()> {
        self.authorization_service
            .require_privilege(actor, privilege, &AuthorizationSubject::Global)
            .await
    }

    async fn require_team(
        &self,
        actor: &UserIdentity,
        privilege: PrivilegeCode,
        tenant_id: TenantId,
    ) -> AppResult<()> {
        self.authorization_service
            .require_privilege(actor, privilege, &AuthorizationSubject::Team(tenant_id))
            .await
    }

    async fn role_of_type(&self, role_id: RoleId, expected: RoleType) -> AppResult<Role> {
        let role = self
            .repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        role.expect_type(expected)?;
        Ok(role)
    }

    async fn require_existing_team(&self, tenant_id: TenantId) -> AppResult<()> {
        if self.repository.find_team(tenant_id).await?.is_none() {
            return Err(AppError::NotFound(format!("team '{tenant_id}' does not exist")));
        }

        Ok(())
    }

    async fn record(
        &self,
        actor: &UserIdentity,
        tenant_id: Option<TenantId>,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id,
                subject: actor.subject().to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
