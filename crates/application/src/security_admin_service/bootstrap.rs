use super::*;

use tracing::info;

impl SecurityAdminService {
    /// Records the signed-in user.
    pub async fn ensure_user(&self, identity: &UserIdentity) -> AppResult<()> {
        self.repository.ensure_user(identity).await
    }

    /// Grants the bootstrap identity the global admin role.
    ///
    /// The role is created with every global privilege when missing. Callers
    /// must have verified the bootstrap token before calling this.
    pub async fn bootstrap_admin(&self, identity: &UserIdentity) -> AppResult<Role> {
        self.ensure_user(identity).await?;

        let role = match self
            .repository
            .find_role_by_name(GLOBAL_ADMIN_ROLE_NAME)
            .await?
        {
            Some(role) => {
                role.expect_type(RoleType::Global)?;
                role
            }
            None => {
                let role = Role::new(
                    RoleId::new(),
                    GLOBAL_ADMIN_ROLE_NAME,
                    Some("Every global privilege.".to_owned()),
                    RoleType::Global,
                    PrivilegeCode::all().filter(|code| RoleType::Global.accepts(*code)),
                )?;
                self.repository.create_role(&role).await?;
                self.record(
                    identity,
                    None,
                    AuditAction::SecurityRoleCreated,
                    "role",
                    role.id().to_string(),
                    format!("bootstrap created role '{}'", role.name()),
                )
                .await?;
                role
            }
        };

        self.repository
            .set_global_role(identity.subject(), Some(role.id()))
            .await?;
        info!(subject = identity.subject(), "bootstrapped global admin");

        self.record(
            identity,
            None,
            AuditAction::SecurityGlobalRoleAssigned,
            "user",
            identity.subject().to_owned(),
            format!("bootstrap assigned global role '{}'", role.id()),
        )
        .await?;

        Ok(role)
    }
}
