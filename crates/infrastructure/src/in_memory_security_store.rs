use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sbaa_application::{
    AuditEvent, AuditRepository, AuthorizationRepository, SbEnvironmentSummary,
    SecurityAdminRepository, TeamDefinition, TenantMembership, UserAccount,
};
use sbaa_core::{AppError, AppResult, TenantId, UserIdentity};
use sbaa_domain::{Ownership, OwnershipGrant, OwnershipId, PrivilegeSources, Role, RoleId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SecurityState {
    roles: HashMap<RoleId, Role>,
    users: HashMap<String, UserAccount>,
    teams: BTreeMap<TenantId, TeamDefinition>,
    memberships: BTreeMap<(TenantId, String), TenantMembership>,
    ownerships: Vec<Ownership>,
    sb_environments: BTreeMap<i64, SbEnvironmentSummary>,
    audit_events: Vec<AuditEvent>,
}

impl SecurityState {
    fn role_in_use(&self, role_id: RoleId) -> bool {
        self.users
            .values()
            .any(|user| user.global_role_id == Some(role_id))
            || self
                .memberships
                .values()
                .any(|membership| membership.role_id == Some(role_id))
            || self
                .ownerships
                .iter()
                .any(|ownership| ownership.is_active() && ownership.role_id() == role_id)
    }

    fn role(&self, role_id: Option<RoleId>) -> Option<Role> {
        role_id.and_then(|role_id| self.roles.get(&role_id).cloned())
    }
}

/// In-memory implementation of every security port.
///
/// One lock guards all state, so privilege sources are always read from a
/// single consistent snapshot.
#[derive(Debug, Default)]
pub struct InMemorySecurityStore {
    state: RwLock<SecurityState>,
}

impl InMemorySecurityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an environment so it can be listed.
    pub async fn insert_sb_environment(&self, id: i64, name: impl Into<String>) {
        self.state.write().await.sb_environments.insert(
            id,
            SbEnvironmentSummary {
                id,
                name: name.into(),
            },
        );
    }

    /// Returns every audit event appended so far.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.read().await.audit_events.clone()
    }
}

#[async_trait]
impl AuthorizationRepository for InMemorySecurityStore {
    async fn load_privilege_sources(
        &self,
        subject: &str,
        tenant_id: Option<TenantId>,
    ) -> AppResult<PrivilegeSources> {
        let state = self.state.read().await;
        let global_role = state.role(
            state
                .users
                .get(subject)
                .and_then(|user| user.global_role_id),
        );

        let membership = tenant_id.and_then(|tenant_id| {
            state
                .memberships
                .get(&(tenant_id, subject.to_owned()))
        });
        let Some(membership) = membership else {
            return Ok(PrivilegeSources {
                global_role,
                ..PrivilegeSources::default()
            });
        };

        let ownerships = state
            .ownerships
            .iter()
            .filter(|ownership| {
                ownership.tenant_id() == membership.tenant_id && ownership.is_active()
            })
            .filter_map(|ownership| {
                state
                    .roles
                    .get(&ownership.role_id())
                    .map(|role| OwnershipGrant {
                        ownership: ownership.clone(),
                        role: role.clone(),
                    })
            })
            .collect();

        Ok(PrivilegeSources {
            global_role,
            membership_role: state.role(membership.role_id),
            ownerships,
        })
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemorySecurityStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.state.read().await.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn create_role(&self, role: &Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state
            .roles
            .values()
            .any(|existing| existing.name() == role.name())
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        state.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        if state.role_in_use(role_id) {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still attached to a user, a membership or an ownership"
            )));
        }

        state.roles.remove(&role_id);
        Ok(())
    }

    async fn list_ownerships(
        &self,
        tenant_id: TenantId,
        include_revoked: bool,
    ) -> AppResult<Vec<Ownership>> {
        Ok(self
            .state
            .read()
            .await
            .ownerships
            .iter()
            .filter(|ownership| ownership.tenant_id() == tenant_id)
            .filter(|ownership| include_revoked || ownership.is_active())
            .cloned()
            .collect())
    }

    async fn find_ownership(&self, ownership_id: OwnershipId) -> AppResult<Option<Ownership>> {
        Ok(self
            .state
            .read()
            .await
            .ownerships
            .iter()
            .find(|ownership| ownership.id() == ownership_id)
            .cloned())
    }

    async fn create_ownership(&self, ownership: &Ownership) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&ownership.role_id()) {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                ownership.role_id()
            )));
        }
        if state
            .ownerships
            .iter()
            .any(|existing| existing.is_active() && existing.same_grant_target(ownership))
        {
            return Err(AppError::Conflict(format!(
                "team '{}' already owns '{}'",
                ownership.tenant_id(),
                ownership.resource()
            )));
        }

        state.ownerships.push(ownership.clone());
        Ok(())
    }

    async fn revoke_ownership(
        &self,
        ownership_id: OwnershipId,
        revoked_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let ownership = state
            .ownerships
            .iter_mut()
            .find(|ownership| ownership.id() == ownership_id)
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "ownership '{ownership_id}' is missing or already revoked"
                ))
            })?;

        ownership.revoke(revoked_at)
    }

    async fn list_memberships(&self, tenant_id: TenantId) -> AppResult<Vec<TenantMembership>> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .values()
            .filter(|membership| membership.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn upsert_membership(&self, membership: &TenantMembership) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.teams.contains_key(&membership.tenant_id) {
            return Err(AppError::NotFound(format!(
                "team '{}' does not exist",
                membership.tenant_id
            )));
        }
        if !state.users.contains_key(&membership.subject) {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                membership.subject
            )));
        }

        state.memberships.insert(
            (membership.tenant_id, membership.subject.clone()),
            membership.clone(),
        );
        Ok(())
    }

    async fn remove_membership(&self, tenant_id: TenantId, subject: &str) -> AppResult<()> {
        self.state
            .write()
            .await
            .memberships
            .remove(&(tenant_id, subject.to_owned()))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user '{subject}' is not a member of team '{tenant_id}'"
                ))
            })
    }

    async fn find_user(&self, subject: &str) -> AppResult<Option<UserAccount>> {
        Ok(self.state.read().await.users.get(subject).cloned())
    }

    async fn ensure_user(&self, identity: &UserIdentity) -> AppResult<()> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .entry(identity.subject().to_owned())
            .or_insert_with(|| UserAccount {
                subject: identity.subject().to_owned(),
                display_name: String::new(),
                email: None,
                global_role_id: None,
            });
        user.display_name = identity.display_name().to_owned();
        user.email = identity.email().map(ToOwned::to_owned);
        Ok(())
    }

    async fn set_global_role(&self, subject: &str, role_id: Option<RoleId>) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(role_id) = role_id
            && !state.roles.contains_key(&role_id)
        {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let user = state
            .users
            .get_mut(subject)
            .ok_or_else(|| AppError::NotFound(format!("user '{subject}' does not exist")))?;
        user.global_role_id = role_id;
        Ok(())
    }

    async fn create_team(&self, team: &TeamDefinition) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.teams.contains_key(&team.tenant_id) {
            return Err(AppError::Conflict(format!(
                "team '{}' already exists",
                team.tenant_id
            )));
        }

        state.teams.insert(team.tenant_id, team.clone());
        Ok(())
    }

    async fn find_team(&self, tenant_id: TenantId) -> AppResult<Option<TeamDefinition>> {
        Ok(self.state.read().await.teams.get(&tenant_id).cloned())
    }

    async fn list_teams(&self) -> AppResult<Vec<TeamDefinition>> {
        let mut teams: Vec<TeamDefinition> =
            self.state.read().await.teams.values().cloned().collect();
        teams.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(teams)
    }

    async fn list_sb_environments(&self) -> AppResult<Vec<SbEnvironmentSummary>> {
        Ok(self
            .state
            .read()
            .await
            .sb_environments
            .values()
            .cloned()
            .collect())
    }

    async fn find_sb_environment(
        &self,
        sb_environment_id: i64,
    ) -> AppResult<Option<SbEnvironmentSummary>> {
        Ok(self
            .state
            .read()
            .await
            .sb_environments
            .get(&sb_environment_id)
            .cloned())
    }
}

#[async_trait]
impl AuditRepository for InMemorySecurityStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.write().await.audit_events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
