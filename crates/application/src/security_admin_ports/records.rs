use sbaa_core::TenantId;
use sbaa_domain::{PrivilegeCode, ResourcePath, RoleId, RoleType};

/// Team projection returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDefinition {
    /// Stable team identifier.
    pub tenant_id: TenantId,
    /// Display name of the team.
    pub name: String,
}

/// User known to the admin backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Stable subject identifier.
    pub subject: String,
    /// Display name.
    pub display_name: String,
    /// Optional email.
    pub email: Option<String>,
    /// Role attached to the user independent of teams.
    pub global_role_id: Option<RoleId>,
}

/// Membership of one user in one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantMembership {
    /// Team the user belongs to.
    pub tenant_id: TenantId,
    /// Member subject.
    pub subject: String,
    /// Optional user-team role.
    pub role_id: Option<RoleId>,
}

/// Starting Blocks environment visible through ownerships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbEnvironmentSummary {
    /// Environment identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Where the role may be attached.
    pub role_type: RoleType,
    /// Privileges bundled by the role.
    pub privileges: Vec<PrivilegeCode>,
}

/// Input payload for granting a resource to a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOwnershipInput {
    /// Team receiving the grant.
    pub tenant_id: TenantId,
    /// Resource-ownership role applied to the resource.
    pub role_id: RoleId,
    /// Granted resource.
    pub resource: ResourcePath,
}

/// Input payload for adding a user to a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignMembershipInput {
    /// Team the user joins.
    pub tenant_id: TenantId,
    /// Member subject.
    pub subject: String,
    /// Optional user-team role.
    pub role_id: Option<RoleId>,
}
