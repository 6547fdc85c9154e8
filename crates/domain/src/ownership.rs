use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sbaa_core::{AppError, AppResult, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::privilege::PrivilegeScope;
use crate::resource::ResourcePath;
use crate::role::RoleId;

/// Stable ownership identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnershipId(Uuid);

impl OwnershipId {
    /// Creates a random ownership identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ownership identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OwnershipId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OwnershipId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for OwnershipId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self).map_err(|error| {
            AppError::Validation(format!("invalid ownership id '{value}': {error}"))
        })
    }
}

/// Grant of one resource to one team through one role.
///
/// Revocation is a soft delete so the grant stays in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    id: OwnershipId,
    tenant_id: TenantId,
    role_id: RoleId,
    resource: ResourcePath,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Ownership {
    /// Creates an active ownership of an environment, an ODS or an ed-org.
    pub fn new(
        id: OwnershipId,
        tenant_id: TenantId,
        role_id: RoleId,
        resource: ResourcePath,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        match resource.level() {
            PrivilegeScope::SbEnvironment | PrivilegeScope::Ods | PrivilegeScope::Edorg => {}
            other => {
                return Err(AppError::Validation(format!(
                    "ownership cannot target a resource at level '{}'",
                    other.as_str()
                )));
            }
        }

        Ok(Self {
            id,
            tenant_id,
            role_id,
            resource,
            created_at,
            deleted_at: None,
        })
    }

    /// Restores a persisted ownership, including its revocation timestamp.
    pub fn restore(
        id: OwnershipId,
        tenant_id: TenantId,
        role_id: RoleId,
        resource: ResourcePath,
        created_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> AppResult<Self> {
        let mut ownership = Self::new(id, tenant_id, role_id, resource, created_at)?;
        ownership.deleted_at = deleted_at;
        Ok(ownership)
    }

    /// Returns the ownership identifier.
    #[must_use]
    pub fn id(&self) -> OwnershipId {
        self.id
    }

    /// Returns the owning team.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the role applied to the resource.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the owned resource.
    #[must_use]
    pub fn resource(&self) -> &ResourcePath {
        &self.resource
    }

    /// Returns the grant timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the revocation timestamp, if revoked.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the ownership still grants anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Soft-deletes the ownership.
    pub fn revoke(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        if self.deleted_at.is_some() {
            return Err(AppError::Conflict(format!(
                "ownership '{}' is already revoked",
                self.id
            )));
        }

        self.deleted_at = Some(at);
        Ok(())
    }

    /// Returns whether both ownerships claim the same resource for the same team.
    #[must_use]
    pub fn same_grant_target(&self, other: &Ownership) -> bool {
        self.tenant_id == other.tenant_id && self.resource == other.resource
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sbaa_core::{AppError, TenantId};

    use crate::resource::ResourcePath;
    use crate::role::RoleId;

    use super::{Ownership, OwnershipId};

    fn ownership(resource: ResourcePath) -> Result<Ownership, AppError> {
        Ownership::new(
            OwnershipId::new(),
            TenantId::new(),
            RoleId::new(),
            resource,
            Utc::now(),
        )
    }

    #[test]
    fn edfi_tenant_ownership_is_rejected() {
        assert!(ownership(ResourcePath::edfi_tenant(1, 2)).is_err());
        assert!(ownership(ResourcePath::sb_environment(1)).is_ok());
        assert!(ownership(ResourcePath::edorg(1, 2, 3, 4)).is_ok());
    }

    #[test]
    fn revoke_is_a_one_way_soft_delete() {
        let Ok(mut ownership) = ownership(ResourcePath::ods(1, 2, 3)) else {
            panic!("ods ownership should be valid");
        };
        assert!(ownership.is_active());

        assert!(ownership.revoke(Utc::now()).is_ok());
        assert!(!ownership.is_active());
        assert!(matches!(
            ownership.revoke(Utc::now()),
            Err(AppError::Conflict(_))
        ));
    }
}
