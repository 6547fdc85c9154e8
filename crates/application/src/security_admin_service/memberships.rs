use super::*;

use crate::security_admin_ports::{AssignMembershipInput, TenantMembership};

impl SecurityAdminService {
    /// Lists memberships of a team.
    pub async fn list_team_memberships(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
    ) -> AppResult<Vec<TenantMembership>> {
        self.require_team(actor, PrivilegeCode::TeamUserTeamMembershipRead, tenant_id)
            .await?;
        self.repository.list_memberships(tenant_id).await
    }

    /// Adds a user to a team, or changes the membership role.
    pub async fn assign_membership(
        &self,
        actor: &UserIdentity,
        input: AssignMembershipInput,
    ) -> AppResult<TenantMembership> {
        self.require_global(actor, PrivilegeCode::UserTeamMembershipCreate)
            .await?;
        self.require_existing_team(input.tenant_id).await?;
        if self.repository.find_user(&input.subject).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                input.subject
            )));
        }
        if let Some(role_id) = input.role_id {
            self.role_of_type(role_id, RoleType::UserTeam).await?;
        }

        let membership = TenantMembership {
            tenant_id: input.tenant_id,
            subject: input.subject,
            role_id: input.role_id,
        };
        self.repository.upsert_membership(&membership).await?;

        self.record(
            actor,
            Some(membership.tenant_id),
            AuditAction::SecurityMembershipAssigned,
            "user_team_membership",
            format!("{}:{}", membership.tenant_id, membership.subject),
            match membership.role_id {
                Some(role_id) => format!("assigned '{}' with role '{role_id}'", membership.subject),
                None => format!("assigned '{}' without a role", membership.subject),
            },
        )
        .await?;

        Ok(membership)
    }

    /// Removes a user from a team.
    pub async fn remove_membership(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<()> {
        self.require_global(actor, PrivilegeCode::UserTeamMembershipDelete)
            .await?;
        self.repository.remove_membership(tenant_id, subject).await?;

        self.record(
            actor,
            Some(tenant_id),
            AuditAction::SecurityMembershipRemoved,
            "user_team_membership",
            format!("{tenant_id}:{subject}"),
            format!("removed '{subject}' from team"),
        )
        .await
    }

    /// Replaces a user's global role.
    pub async fn assign_global_role(
        &self,
        actor: &UserIdentity,
        subject: &str,
        role_id: Option<RoleId>,
    ) -> AppResult<()> {
        self.require_global(actor, PrivilegeCode::UserUpdate).await?;
        if let Some(role_id) = role_id {
            self.role_of_type(role_id, RoleType::Global).await?;
        }
        self.repository.set_global_role(subject, role_id).await?;

        self.record(
            actor,
            None,
            AuditAction::SecurityGlobalRoleAssigned,
            "user",
            subject.to_owned(),
            match role_id {
                Some(role_id) => format!("set global role '{role_id}'"),
                None => "cleared global role".to_owned(),
            },
        )
        .await
    }
}
