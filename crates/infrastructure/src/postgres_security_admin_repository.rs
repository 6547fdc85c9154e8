use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use sbaa_application::{
    SbEnvironmentSummary, SecurityAdminRepository, TeamDefinition, TenantMembership, UserAccount,
};
use sbaa_core::{AppError, AppResult, TenantId, UserIdentity};
use sbaa_domain::{Ownership, OwnershipId, Role, RoleId};

use crate::postgres_security_rows::{
    OWNERSHIP_COLUMNS, OwnershipRow, RoleSelection, fetch_roles, map_unique_conflict,
    resource_columns,
};

mod directory;
mod ownerships;
mod roles;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for security administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.find_role_by_name_impl(name).await
    }

    async fn create_role(&self, role: &Role) -> AppResult<()> {
        self.create_role_impl(role).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn list_ownerships(
        &self,
        tenant_id: TenantId,
        include_revoked: bool,
    ) -> AppResult<Vec<Ownership>> {
        self.list_ownerships_impl(tenant_id, include_revoked).await
    }

    async fn find_ownership(&self, ownership_id: OwnershipId) -> AppResult<Option<Ownership>> {
        self.find_ownership_impl(ownership_id).await
    }

    async fn create_ownership(&self, ownership: &Ownership) -> AppResult<()> {
        self.create_ownership_impl(ownership).await
    }

    async fn revoke_ownership(
        &self,
        ownership_id: OwnershipId,
        revoked_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.revoke_ownership_impl(ownership_id, revoked_at).await
    }

    async fn list_memberships(&self, tenant_id: TenantId) -> AppResult<Vec<TenantMembership>> {
        self.list_memberships_impl(tenant_id).await
    }

    async fn upsert_membership(&self, membership: &TenantMembership) -> AppResult<()> {
        self.upsert_membership_impl(membership).await
    }

    async fn remove_membership(&self, tenant_id: TenantId, subject: &str) -> AppResult<()> {
        self.remove_membership_impl(tenant_id, subject).await
    }

    async fn find_user(&self, subject: &str) -> AppResult<Option<UserAccount>> {
        self.find_user_impl(subject).await
    }

    async fn ensure_user(&self, identity: &UserIdentity) -> AppResult<()> {
        self.ensure_user_impl(identity).await
    }

    async fn set_global_role(&self, subject: &str, role_id: Option<RoleId>) -> AppResult<()> {
        self.set_global_role_impl(subject, role_id).await
    }

    async fn create_team(&self, team: &TeamDefinition) -> AppResult<()> {
        self.create_team_impl(team).await
    }

    async fn find_team(&self, tenant_id: TenantId) -> AppResult<Option<TeamDefinition>> {
        self.find_team_impl(tenant_id).await
    }

    async fn list_teams(&self) -> AppResult<Vec<TeamDefinition>> {
        self.list_teams_impl().await
    }

    async fn list_sb_environments(&self) -> AppResult<Vec<SbEnvironmentSummary>> {
        self.list_sb_environments_impl().await
    }

    async fn find_sb_environment(
        &self,
        sb_environment_id: i64,
    ) -> AppResult<Option<SbEnvironmentSummary>> {
        self.find_sb_environment_impl(sb_environment_id).await
    }
}

impl PostgresSecurityAdminRepository {
    async fn acquire(&self) -> AppResult<sqlx::pool::PoolConnection<sqlx::Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|error| AppError::Internal(format!("failed to acquire connection: {error}")))
    }
}
