use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sbaa_core::{AppResult, TenantId, UserIdentity};
use sbaa_domain::{Ownership, OwnershipId, Role, RoleId};

use super::records::{SbEnvironmentSummary, TeamDefinition, TenantMembership, UserAccount};

/// Repository port for roles, ownerships, memberships and teams.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists every role.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Persists a new role. Duplicate names are a conflict.
    async fn create_role(&self, role: &Role) -> AppResult<()>;

    /// Deletes a role that nothing references.
    ///
    /// A role still attached to a user, a membership or an active ownership
    /// is a conflict.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Lists ownerships of a team.
    async fn list_ownerships(
        &self,
        tenant_id: TenantId,
        include_revoked: bool,
    ) -> AppResult<Vec<Ownership>>;

    /// Finds an ownership by id, revoked or not.
    async fn find_ownership(&self, ownership_id: OwnershipId) -> AppResult<Option<Ownership>>;

    /// Persists a new ownership. A second active grant of the same resource
    /// to the same team is a conflict.
    async fn create_ownership(&self, ownership: &Ownership) -> AppResult<()>;

    /// Soft-deletes an active ownership.
    async fn revoke_ownership(
        &self,
        ownership_id: OwnershipId,
        revoked_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Lists memberships of a team.
    async fn list_memberships(&self, tenant_id: TenantId) -> AppResult<Vec<TenantMembership>>;

    /// Creates or replaces a membership.
    async fn upsert_membership(&self, membership: &TenantMembership) -> AppResult<()>;

    /// Removes a membership.
    async fn remove_membership(&self, tenant_id: TenantId, subject: &str) -> AppResult<()>;

    /// Finds a user by subject.
    async fn find_user(&self, subject: &str) -> AppResult<Option<UserAccount>>;

    /// Creates the user on first sight and refreshes its profile afterwards.
    async fn ensure_user(&self, identity: &UserIdentity) -> AppResult<()>;

    /// Replaces a user's global role.
    async fn set_global_role(&self, subject: &str, role_id: Option<RoleId>) -> AppResult<()>;

    /// Persists a new team.
    async fn create_team(&self, team: &TeamDefinition) -> AppResult<()>;

    /// Finds a team by id.
    async fn find_team(&self, tenant_id: TenantId) -> AppResult<Option<TeamDefinition>>;

    /// Lists every team.
    async fn list_teams(&self) -> AppResult<Vec<TeamDefinition>>;

    /// Lists every environment.
    async fn list_sb_environments(&self) -> AppResult<Vec<SbEnvironmentSummary>>;

    /// Finds an environment by id.
    async fn find_sb_environment(
        &self,
        sb_environment_id: i64,
    ) -> AppResult<Option<SbEnvironmentSummary>>;
}
