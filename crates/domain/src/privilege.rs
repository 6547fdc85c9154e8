use std::fmt::{Display, Formatter};
use std::str::FromStr;

use sbaa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Resource level a privilege is evaluated against.
///
/// Variants are ordered from the broadest scope to the most specific one so
/// that `a < b` reads as "`a` is an ancestor level of `b`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrivilegeScope {
    /// Not tied to any team.
    Global,
    /// The team itself.
    Team,
    /// One Starting Blocks environment owned by or shared with the team.
    SbEnvironment,
    /// One Ed-Fi tenant inside an environment.
    EdfiTenant,
    /// One ODS instance inside an Ed-Fi tenant.
    Ods,
    /// One education organization inside an ODS.
    Edorg,
}

impl PrivilegeScope {
    /// Returns the number of resource path ids a subject at this scope carries.
    #[must_use]
    pub fn path_depth(&self) -> usize {
        match self {
            Self::Global | Self::Team => 0,
            Self::SbEnvironment => 1,
            Self::EdfiTenant => 2,
            Self::Ods => 3,
            Self::Edorg => 4,
        }
    }

    /// Returns whether subjects at this scope address a concrete resource.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        self.path_depth() > 0
    }

    /// Returns a stable label for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Team => "team",
            Self::SbEnvironment => "sb-environment",
            Self::EdfiTenant => "edfi-tenant",
            Self::Ods => "ods",
            Self::Edorg => "edorg",
        }
    }
}

/// Action part of a privilege code, the segment after the colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeAction {
    /// Read access.
    Read,
    /// Create access.
    Create,
    /// Update access.
    Update,
    /// Delete access.
    Delete,
    /// Archive access.
    Archive,
}

impl PrivilegeAction {
    /// Returns the stable action segment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Archive => "archive",
        }
    }
}

/// Every privilege known to the system.
///
/// The catalog is closed: codes are never built at runtime, only looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrivilegeCode {
    /// `me:read`
    MeRead,
    /// `privilege:read`
    PrivilegeRead,
    /// `role:read`
    RoleRead,
    /// `role:create`
    RoleCreate,
    /// `role:update`
    RoleUpdate,
    /// `role:delete`
    RoleDelete,
    /// `ownership:read`
    OwnershipRead,
    /// `ownership:create`
    OwnershipCreate,
    /// `ownership:update`
    OwnershipUpdate,
    /// `ownership:delete`
    OwnershipDelete,
    /// `user:read`
    UserRead,
    /// `user:create`
    UserCreate,
    /// `user:update`
    UserUpdate,
    /// `user:delete`
    UserDelete,
    /// `team:read`
    TeamRead,
    /// `team:create`
    TeamCreate,
    /// `team:update`
    TeamUpdate,
    /// `team:delete`
    TeamDelete,
    /// `user-team-membership:read`
    UserTeamMembershipRead,
    /// `user-team-membership:create`
    UserTeamMembershipCreate,
    /// `user-team-membership:update`
    UserTeamMembershipUpdate,
    /// `user-team-membership:delete`
    UserTeamMembershipDelete,
    /// `sb-environment:read`
    SbEnvironmentRead,
    /// `sb-environment:create`
    SbEnvironmentCreate,
    /// `sb-environment:update`
    SbEnvironmentUpdate,
    /// `sb-environment:delete`
    SbEnvironmentDelete,
    /// `sb-environment.edfi-tenant:read`
    SbEnvironmentEdfiTenantRead,
    /// `sb-sync-queue:read`
    SbSyncQueueRead,
    /// `sb-sync-queue:archive`
    SbSyncQueueArchive,
    /// `team.ownership:read`
    TeamOwnershipRead,
    /// `team.role:read`
    TeamRoleRead,
    /// `team.user:read`
    TeamUserRead,
    /// `team.user-team-membership:read`
    TeamUserTeamMembershipRead,
    /// `team.user-team-membership:create`
    TeamUserTeamMembershipCreate,
    /// `team.user-team-membership:update`
    TeamUserTeamMembershipUpdate,
    /// `team.user-team-membership:delete`
    TeamUserTeamMembershipDelete,
    /// `team.sb-environment:read`
    TeamSbEnvironmentRead,
    /// `team.sb-environment:create`
    TeamSbEnvironmentCreate,
    /// `team.sb-environment.edfi-tenant:read`
    TeamSbEnvironmentEdfiTenantRead,
    /// `team.sb-environment.edfi-tenant.ods:read`
    TeamSbEnvironmentEdfiTenantOdsRead,
    /// `team.sb-environment.edfi-tenant.ods:create`
    TeamSbEnvironmentEdfiTenantOdsCreate,
    /// `team.sb-environment.edfi-tenant.ods:delete`
    TeamSbEnvironmentEdfiTenantOdsDelete,
    /// `team.sb-environment.edfi-tenant.ods.edorg:read`
    TeamSbEnvironmentEdfiTenantOdsEdorgRead,
    /// `team.sb-environment.edfi-tenant.ods.edorg:create`
    TeamSbEnvironmentEdfiTenantOdsEdorgCreate,
    /// `team.sb-environment.edfi-tenant.ods.edorg:delete`
    TeamSbEnvironmentEdfiTenantOdsEdorgDelete,
    /// `team.sb-environment.edfi-tenant.vendor:read`
    TeamSbEnvironmentEdfiTenantVendorRead,
    /// `team.sb-environment.edfi-tenant.vendor:create`
    TeamSbEnvironmentEdfiTenantVendorCreate,
    /// `team.sb-environment.edfi-tenant.vendor:update`
    TeamSbEnvironmentEdfiTenantVendorUpdate,
    /// `team.sb-environment.edfi-tenant.vendor:delete`
    TeamSbEnvironmentEdfiTenantVendorDelete,
    /// `team.sb-environment.edfi-tenant.claimset:read`
    TeamSbEnvironmentEdfiTenantClaimsetRead,
    /// `team.sb-environment.edfi-tenant.claimset:create`
    TeamSbEnvironmentEdfiTenantClaimsetCreate,
    /// `team.sb-environment.edfi-tenant.claimset:update`
    TeamSbEnvironmentEdfiTenantClaimsetUpdate,
    /// `team.sb-environment.edfi-tenant.claimset:delete`
    TeamSbEnvironmentEdfiTenantClaimsetDelete,
}

/// Catalog entry describing one privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeDefinition {
    /// Typed code.
    pub code: PrivilegeCode,
    /// Stable storage and transport value.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Level the privilege is evaluated against.
    pub scope: PrivilegeScope,
    /// Action segment.
    pub action: PrivilegeAction,
}

// Ordered exactly like the `PrivilegeCode` variants.
const CATALOG: &[PrivilegeDefinition] = &[
    PrivilegeDefinition {
        code: PrivilegeCode::MeRead,
        key: "me:read",
        name: "Read own profile",
        description: "Read the profile and privileges of the signed-in user.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::PrivilegeRead,
        key: "privilege:read",
        name: "Read privileges",
        description: "Read the privilege catalog.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::RoleRead,
        key: "role:read",
        name: "Read roles",
        description: "Read all roles.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::RoleCreate,
        key: "role:create",
        name: "Create roles",
        description: "Create roles of any type.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::RoleUpdate,
        key: "role:update",
        name: "Update roles",
        description: "Update roles of any type.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::RoleDelete,
        key: "role:delete",
        name: "Delete roles",
        description: "Delete unreferenced roles.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::OwnershipRead,
        key: "ownership:read",
        name: "Read ownerships",
        description: "Read resource ownerships of every team.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::OwnershipCreate,
        key: "ownership:create",
        name: "Create ownerships",
        description: "Grant a team ownership of a resource.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::OwnershipUpdate,
        key: "ownership:update",
        name: "Update ownerships",
        description: "Change the role of an ownership.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::OwnershipDelete,
        key: "ownership:delete",
        name: "Revoke ownerships",
        description: "Revoke a team's ownership of a resource.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserRead,
        key: "user:read",
        name: "Read users",
        description: "Read all users.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserCreate,
        key: "user:create",
        name: "Create users",
        description: "Create users.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserUpdate,
        key: "user:update",
        name: "Update users",
        description: "Update users, including their global role.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserDelete,
        key: "user:delete",
        name: "Delete users",
        description: "Delete users.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamRead,
        key: "team:read",
        name: "Read teams",
        description: "Read all teams.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamCreate,
        key: "team:create",
        name: "Create teams",
        description: "Create teams.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUpdate,
        key: "team:update",
        name: "Update teams",
        description: "Update teams.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamDelete,
        key: "team:delete",
        name: "Delete teams",
        description: "Delete teams.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserTeamMembershipRead,
        key: "user-team-membership:read",
        name: "Read memberships",
        description: "Read team memberships of every team.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserTeamMembershipCreate,
        key: "user-team-membership:create",
        name: "Create memberships",
        description: "Add a user to any team.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserTeamMembershipUpdate,
        key: "user-team-membership:update",
        name: "Update memberships",
        description: "Change the role of any team membership.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::UserTeamMembershipDelete,
        key: "user-team-membership:delete",
        name: "Delete memberships",
        description: "Remove a user from any team.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbEnvironmentRead,
        key: "sb-environment:read",
        name: "Read environments",
        description: "Read every Starting Blocks environment.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbEnvironmentCreate,
        key: "sb-environment:create",
        name: "Create environments",
        description: "Register Starting Blocks environments.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbEnvironmentUpdate,
        key: "sb-environment:update",
        name: "Update environments",
        description: "Update Starting Blocks environments.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbEnvironmentDelete,
        key: "sb-environment:delete",
        name: "Delete environments",
        description: "Delete Starting Blocks environments.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbEnvironmentEdfiTenantRead,
        key: "sb-environment.edfi-tenant:read",
        name: "Read Ed-Fi tenants",
        description: "Read the Ed-Fi tenants of every environment.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbSyncQueueRead,
        key: "sb-sync-queue:read",
        name: "Read sync queue",
        description: "Read the environment sync queue.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::SbSyncQueueArchive,
        key: "sb-sync-queue:archive",
        name: "Archive sync queue items",
        description: "Archive finished sync queue items.",
        scope: PrivilegeScope::Global,
        action: PrivilegeAction::Archive,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamOwnershipRead,
        key: "team.ownership:read",
        name: "Read team ownerships",
        description: "Read the resources owned by the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamRoleRead,
        key: "team.role:read",
        name: "Read team roles",
        description: "Read the roles available to the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUserRead,
        key: "team.user:read",
        name: "Read team users",
        description: "Read the users of the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUserTeamMembershipRead,
        key: "team.user-team-membership:read",
        name: "Read team memberships",
        description: "Read the memberships of the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUserTeamMembershipCreate,
        key: "team.user-team-membership:create",
        name: "Create team memberships",
        description: "Add users to the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUserTeamMembershipUpdate,
        key: "team.user-team-membership:update",
        name: "Update team memberships",
        description: "Change membership roles in the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamUserTeamMembershipDelete,
        key: "team.user-team-membership:delete",
        name: "Delete team memberships",
        description: "Remove users from the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentRead,
        key: "team.sb-environment:read",
        name: "Read team environments",
        description: "Read environments the team has access to.",
        scope: PrivilegeScope::SbEnvironment,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentCreate,
        key: "team.sb-environment:create",
        name: "Create team environments",
        description: "Register new environments on behalf of the team.",
        scope: PrivilegeScope::Team,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantRead,
        key: "team.sb-environment.edfi-tenant:read",
        name: "Read team Ed-Fi tenants",
        description: "Read Ed-Fi tenants the team has access to.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsRead,
        key: "team.sb-environment.edfi-tenant.ods:read",
        name: "Read team ODSs",
        description: "Read ODS instances the team has access to.",
        scope: PrivilegeScope::Ods,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsCreate,
        key: "team.sb-environment.edfi-tenant.ods:create",
        name: "Create team ODSs",
        description: "Create ODS instances in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsDelete,
        key: "team.sb-environment.edfi-tenant.ods:delete",
        name: "Delete team ODSs",
        description: "Delete ODS instances.",
        scope: PrivilegeScope::Ods,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsEdorgRead,
        key: "team.sb-environment.edfi-tenant.ods.edorg:read",
        name: "Read team ed-orgs",
        description: "Read education organizations the team has access to.",
        scope: PrivilegeScope::Edorg,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsEdorgCreate,
        key: "team.sb-environment.edfi-tenant.ods.edorg:create",
        name: "Create team ed-orgs",
        description: "Create education organizations in an ODS.",
        scope: PrivilegeScope::Ods,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantOdsEdorgDelete,
        key: "team.sb-environment.edfi-tenant.ods.edorg:delete",
        name: "Delete team ed-orgs",
        description: "Delete education organizations.",
        scope: PrivilegeScope::Edorg,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantVendorRead,
        key: "team.sb-environment.edfi-tenant.vendor:read",
        name: "Read team vendors",
        description: "Read vendors in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantVendorCreate,
        key: "team.sb-environment.edfi-tenant.vendor:create",
        name: "Create team vendors",
        description: "Create vendors in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantVendorUpdate,
        key: "team.sb-environment.edfi-tenant.vendor:update",
        name: "Update team vendors",
        description: "Update vendors in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantVendorDelete,
        key: "team.sb-environment.edfi-tenant.vendor:delete",
        name: "Delete team vendors",
        description: "Delete vendors in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Delete,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantClaimsetRead,
        key: "team.sb-environment.edfi-tenant.claimset:read",
        name: "Read team claimsets",
        description: "Read claimsets in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Read,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantClaimsetCreate,
        key: "team.sb-environment.edfi-tenant.claimset:create",
        name: "Create team claimsets",
        description: "Create claimsets in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Create,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantClaimsetUpdate,
        key: "team.sb-environment.edfi-tenant.claimset:update",
        name: "Update team claimsets",
        description: "Update claimsets in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Update,
    },
    PrivilegeDefinition {
        code: PrivilegeCode::TeamSbEnvironmentEdfiTenantClaimsetDelete,
        key: "team.sb-environment.edfi-tenant.claimset:delete",
        name: "Delete team claimsets",
        description: "Delete claimsets in an Ed-Fi tenant.",
        scope: PrivilegeScope::EdfiTenant,
        action: PrivilegeAction::Delete,
    },
];

impl PrivilegeCode {
    /// Returns the catalog entry for this code.
    #[must_use]
    pub fn definition(self) -> &'static PrivilegeDefinition {
        &CATALOG[self as usize]
    }

    /// Returns a stable storage value for this privilege.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.definition().key
    }

    /// Returns the level this privilege is evaluated against.
    #[must_use]
    pub fn scope(self) -> PrivilegeScope {
        self.definition().scope
    }

    /// Returns the action segment.
    #[must_use]
    pub fn action(self) -> PrivilegeAction {
        self.definition().action
    }

    /// Returns the dot-separated resource segments before the colon.
    pub fn resource_segments(self) -> impl Iterator<Item = &'static str> {
        let key = self.as_str();
        let path = key.split_once(':').map_or(key, |(path, _)| path);
        path.split('.')
    }

    /// Returns all known privileges in catalog order.
    pub fn all() -> impl Iterator<Item = Self> {
        CATALOG.iter().map(|definition| definition.code)
    }

    /// Parses a transport value into a privilege.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl Display for PrivilegeCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PrivilegeCode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|definition| definition.key == value)
            .map(|definition| definition.code)
            .ok_or_else(|| AppError::Validation(format!("unknown privilege value '{value}'")))
    }
}

/// Read-only view over the static privilege catalog.
pub struct PrivilegeCatalog;

impl PrivilegeCatalog {
    /// Returns every catalog entry.
    #[must_use]
    pub fn definitions() -> &'static [PrivilegeDefinition] {
        CATALOG
    }

    /// Looks up a catalog entry by its storage value.
    pub fn lookup(key: &str) -> AppResult<&'static PrivilegeDefinition> {
        CATALOG
            .iter()
            .find(|definition| definition.key == key)
            .ok_or_else(|| AppError::NotFound(format!("privilege '{key}' does not exist")))
    }
}
