use super::*;

use sbaa_domain::{PrivilegeCatalog, PrivilegeDefinition};

use crate::security_admin_ports::CreateRoleInput;

impl SecurityAdminService {
    /// Returns the privilege catalog.
    pub async fn list_privileges(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<&'static [PrivilegeDefinition]> {
        self.require_global(actor, PrivilegeCode::PrivilegeRead)
            .await?;
        Ok(PrivilegeCatalog::definitions())
    }

    /// Returns every role.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<Role>> {
        self.require_global(actor, PrivilegeCode::RoleRead).await?;
        self.repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<Role> {
        self.require_global(actor, PrivilegeCode::RoleRead).await?;
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    /// Creates a role and emits an audit event.
    pub async fn create_role(&self, actor: &UserIdentity, input: CreateRoleInput) -> AppResult<Role> {
        self.require_global(actor, PrivilegeCode::RoleCreate).await?;

        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            input.role_type,
            input.privileges,
        )?;
        self.repository.create_role(&role).await?;

        self.record(
            actor,
            None,
            AuditAction::SecurityRoleCreated,
            "role",
            role.id().to_string(),
            format!(
                "created {} role '{}' with {} privileges",
                role.role_type().as_str(),
                role.name(),
                role.privileges().len()
            ),
        )
        .await?;

        Ok(role)
    }

    /// Deletes an unreferenced role and emits an audit event.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.require_global(actor, PrivilegeCode::RoleDelete).await?;

        let role = self
            .repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        self.repository.delete_role(role_id).await?;

        self.record(
            actor,
            None,
            AuditAction::SecurityRoleDeleted,
            "role",
            role_id.to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await
    }
}
