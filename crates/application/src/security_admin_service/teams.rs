use super::*;

use sbaa_core::NonEmptyString;

use crate::security_admin_ports::TeamDefinition;

impl SecurityAdminService {
    /// Lists every team.
    pub async fn list_teams(&self, actor: &UserIdentity) -> AppResult<Vec<TeamDefinition>> {
        self.require_global(actor, PrivilegeCode::TeamRead).await?;
        self.repository.list_teams().await
    }

    /// Creates a team and emits an audit event.
    pub async fn create_team(&self, actor: &UserIdentity, name: &str) -> AppResult<TeamDefinition> {
        self.require_global(actor, PrivilegeCode::TeamCreate).await?;

        let team = TeamDefinition {
            tenant_id: TenantId::new(),
            name: NonEmptyString::new(name.trim())?.into(),
        };
        self.repository.create_team(&team).await?;

        self.record(
            actor,
            Some(team.tenant_id),
            AuditAction::SecurityTeamCreated,
            "team",
            team.tenant_id.to_string(),
            format!("created team '{}'", team.name),
        )
        .await?;

        Ok(team)
    }
}
