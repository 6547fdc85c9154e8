use std::sync::Arc;

use async_trait::async_trait;
use sbaa_core::{AppResult, TenantId, UserIdentity};
use sbaa_domain::{
    AccessFilter, AuditAction, AuthorizationDecision, AuthorizationSubject, EffectivePrivileges,
    PrivilegeCode, PrivilegeSources,
};

use crate::{AuditEvent, AuditRepository};

mod privileges;

#[cfg(test)]
mod tests;

/// Repository port for privilege lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Loads the roles and ownerships that feed a subject's privileges.
    ///
    /// Implementations read everything in one consistent snapshot. The team's
    /// ownerships and the membership role are loaded only when the subject is
    /// a member of the team; otherwise, and without a team, only the global
    /// role is loaded.
    async fn load_privilege_sources(
        &self,
        subject: &str,
        tenant_id: Option<TenantId>,
    ) -> AppResult<PrivilegeSources>;
}

/// Application service for team-scoped authorization checks.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its ports.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Resolves the actor's effective privileges in an optional team context.
    pub async fn effective_privileges(
        &self,
        actor: &UserIdentity,
        tenant_id: Option<TenantId>,
    ) -> AppResult<EffectivePrivileges> {
        let sources = self
            .repository
            .load_privilege_sources(actor.subject(), tenant_id)
            .await?;

        Ok(EffectivePrivileges::aggregate(tenant_id, &sources))
    }

    async fn record_denial(
        &self,
        actor: &UserIdentity,
        privilege: PrivilegeCode,
        subject: &AuthorizationSubject,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: subject.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::SecurityAuthorizationDenied,
                resource_type: "privilege".to_owned(),
                resource_id: privilege.as_str().to_owned(),
                detail: Some(format!(
                    "denied '{}' on '{subject}'",
                    privilege.as_str()
                )),
            })
            .await
    }
}
