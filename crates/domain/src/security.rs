use std::str::FromStr;

use sbaa_core::AppError;
use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a team is created.
    SecurityTeamCreated,
    /// Emitted when a role is created.
    SecurityRoleCreated,
    /// Emitted when an unreferenced role is deleted.
    SecurityRoleDeleted,
    /// Emitted when a team is granted a resource.
    SecurityOwnershipGranted,
    /// Emitted when a resource grant is soft-deleted.
    SecurityOwnershipRevoked,
    /// Emitted when a user joins a team or changes membership role.
    SecurityMembershipAssigned,
    /// Emitted when a user leaves a team.
    SecurityMembershipRemoved,
    /// Emitted when a user's global role changes.
    SecurityGlobalRoleAssigned,
    /// Emitted when an authorization check is denied.
    SecurityAuthorizationDenied,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityTeamCreated => "security.team.created",
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleDeleted => "security.role.deleted",
            Self::SecurityOwnershipGranted => "security.ownership.granted",
            Self::SecurityOwnershipRevoked => "security.ownership.revoked",
            Self::SecurityMembershipAssigned => "security.membership.assigned",
            Self::SecurityMembershipRemoved => "security.membership.removed",
            Self::SecurityGlobalRoleAssigned => "security.global_role.assigned",
            Self::SecurityAuthorizationDenied => "security.authorization.denied",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "security.team.created" => Ok(Self::SecurityTeamCreated),
            "security.role.created" => Ok(Self::SecurityRoleCreated),
            "security.role.deleted" => Ok(Self::SecurityRoleDeleted),
            "security.ownership.granted" => Ok(Self::SecurityOwnershipGranted),
            "security.ownership.revoked" => Ok(Self::SecurityOwnershipRevoked),
            "security.membership.assigned" => Ok(Self::SecurityMembershipAssigned),
            "security.membership.removed" => Ok(Self::SecurityMembershipRemoved),
            "security.global_role.assigned" => Ok(Self::SecurityGlobalRoleAssigned),
            "security.authorization.denied" => Ok(Self::SecurityAuthorizationDenied),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}
