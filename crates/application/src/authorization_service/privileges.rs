use sbaa_core::AppError;
use sbaa_domain::authorize;
use tracing::info;

use super::*;

impl AuthorizationService {
    /// Evaluates one privilege for the actor against a subject.
    ///
    /// Denials are audited and returned as a decision, never as an error.
    /// Errors are reserved for malformed subjects and repository failures.
    pub async fn authorize(
        &self,
        actor: &UserIdentity,
        privilege: PrivilegeCode,
        subject: &AuthorizationSubject,
    ) -> AppResult<AuthorizationDecision> {
        let privileges = self
            .effective_privileges(actor, subject.tenant_id())
            .await?;
        let decision = authorize(&privileges, privilege, subject)?;

        if decision == AuthorizationDecision::Deny {
            info!(
                subject = actor.subject(),
                privilege = privilege.as_str(),
                target = %subject,
                "authorization denied"
            );
            self.record_denial(actor, privilege, subject).await?;
        }

        Ok(decision)
    }

    /// Ensures the actor holds a privilege for one concrete subject.
    pub async fn require_privilege(
        &self,
        actor: &UserIdentity,
        privilege: PrivilegeCode,
        subject: &AuthorizationSubject,
    ) -> AppResult<()> {
        match self.authorize(actor, privilege, subject).await? {
            AuthorizationDecision::Allow => Ok(()),
            AuthorizationDecision::Deny => Err(forbidden(actor, privilege, subject)),
            AuthorizationDecision::Filter(_) => Err(AppError::Internal(format!(
                "privilege '{}' was checked against collection subject '{subject}' where a point check was required",
                privilege.as_str()
            ))),
        }
    }

    /// Resolves the collection filter the actor's results must be scoped to.
    pub async fn require_filter(
        &self,
        actor: &UserIdentity,
        privilege: PrivilegeCode,
        tenant_id: TenantId,
    ) -> AppResult<AccessFilter> {
        let subject = AuthorizationSubject::AnyInstance(tenant_id);
        match self.authorize(actor, privilege, &subject).await? {
            AuthorizationDecision::Filter(filter) => Ok(filter),
            AuthorizationDecision::Deny => Err(forbidden(actor, privilege, &subject)),
            AuthorizationDecision::Allow => Err(AppError::Internal(format!(
                "collection check for privilege '{}' returned an unscoped allow",
                privilege.as_str()
            ))),
        }
    }
}

fn forbidden(
    actor: &UserIdentity,
    privilege: PrivilegeCode,
    subject: &AuthorizationSubject,
) -> AppError {
    AppError::Forbidden(format!(
        "subject '{}' is missing privilege '{}' for '{subject}'",
        actor.subject(),
        privilege.as_str()
    ))
}
