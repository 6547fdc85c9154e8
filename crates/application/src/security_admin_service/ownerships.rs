use super::*;

use chrono::Utc;
use sbaa_domain::{Ownership, OwnershipId};

use crate::security_admin_ports::GrantOwnershipInput;

impl SecurityAdminService {
    /// Lists the active ownerships of a team.
    pub async fn list_team_ownerships(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
    ) -> AppResult<Vec<Ownership>> {
        self.require_team(actor, PrivilegeCode::TeamOwnershipRead, tenant_id)
            .await?;
        self.repository.list_ownerships(tenant_id, false).await
    }

    /// Grants a resource to a team through a resource-ownership role.
    pub async fn grant_ownership(
        &self,
        actor: &UserIdentity,
        input: GrantOwnershipInput,
    ) -> AppResult<Ownership> {
        self.require_global(actor, PrivilegeCode::OwnershipCreate)
            .await?;
        self.require_existing_team(input.tenant_id).await?;
        let role = self
            .role_of_type(input.role_id, RoleType::ResourceOwnership)
            .await?;

        let ownership = Ownership::new(
            OwnershipId::new(),
            input.tenant_id,
            role.id(),
            input.resource,
            Utc::now(),
        )?;

        let existing = self
            .repository
            .list_ownerships(input.tenant_id, false)
            .await?;
        if existing
            .iter()
            .any(|active| active.same_grant_target(&ownership))
        {
            return Err(AppError::Conflict(format!(
                "team '{}' already owns '{}'",
                input.tenant_id,
                ownership.resource()
            )));
        }

        self.repository.create_ownership(&ownership).await?;

        self.record(
            actor,
            Some(ownership.tenant_id()),
            AuditAction::SecurityOwnershipGranted,
            "ownership",
            ownership.id().to_string(),
            format!(
                "granted '{}' with role '{}'",
                ownership.resource(),
                role.name()
            ),
        )
        .await?;

        Ok(ownership)
    }

    /// Soft-deletes an ownership and emits an audit event.
    pub async fn revoke_ownership(
        &self,
        actor: &UserIdentity,
        ownership_id: OwnershipId,
    ) -> AppResult<Ownership> {
        self.require_global(actor, PrivilegeCode::OwnershipDelete)
            .await?;

        let mut ownership = self
            .repository
            .find_ownership(ownership_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("ownership '{ownership_id}' does not exist"))
            })?;
        let revoked_at = Utc::now();
        ownership.revoke(revoked_at)?;
        self.repository
            .revoke_ownership(ownership_id, revoked_at)
            .await?;

        self.record(
            actor,
            Some(ownership.tenant_id()),
            AuditAction::SecurityOwnershipRevoked,
            "ownership",
            ownership_id.to_string(),
            format!("revoked '{}'", ownership.resource()),
        )
        .await?;

        Ok(ownership)
    }
}
