use super::*;

use sbaa_domain::ResourcePath;

use crate::security_admin_ports::SbEnvironmentSummary;

impl SecurityAdminService {
    /// Lists the environments a team's ownerships reach.
    ///
    /// The listing runs in filter mode: only environments the actor's
    /// coverage permits are returned.
    pub async fn list_visible_sb_environments(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
    ) -> AppResult<Vec<SbEnvironmentSummary>> {
        let filter = self
            .authorization_service
            .require_filter(actor, PrivilegeCode::TeamSbEnvironmentRead, tenant_id)
            .await?;

        let visible = filter.sb_environment_ids();
        if visible.is_empty() {
            return Ok(Vec::new());
        }

        let environments = self.repository.list_sb_environments().await?;
        Ok(environments
            .into_iter()
            .filter(|environment| visible.contains(&environment.id))
            .collect())
    }

    /// Returns one environment the actor may read in a team context.
    pub async fn get_sb_environment(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
        sb_environment_id: i64,
    ) -> AppResult<SbEnvironmentSummary> {
        self.authorization_service
            .require_privilege(
                actor,
                PrivilegeCode::TeamSbEnvironmentRead,
                &AuthorizationSubject::Resource {
                    tenant_id,
                    path: ResourcePath::sb_environment(sb_environment_id),
                },
            )
            .await?;

        self.repository
            .find_sb_environment(sb_environment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "environment '{sb_environment_id}' does not exist"
                ))
            })
    }
}
