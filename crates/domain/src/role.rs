use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use sbaa_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::privilege::{PrivilegeCode, PrivilegeScope};

/// Stable role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
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

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid role id '{value}': {error}")))
    }
}

/// Where a role may be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleType {
    /// Attached directly to a user, independent of teams.
    Global,
    /// Attached to a user's membership in one team.
    UserTeam,
    /// Attached to a team's ownership of one resource.
    ResourceOwnership,
}

impl RoleType {
    /// Returns a stable storage value for this role type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::UserTeam => "user-team",
            Self::ResourceOwnership => "resource-ownership",
        }
    }

    /// Returns whether a role of this type may carry the privilege.
    #[must_use]
    pub fn accepts(&self, privilege: PrivilegeCode) -> bool {
        let scope = privilege.scope();
        match self {
            Self::Global => scope == PrivilegeScope::Global,
            Self::UserTeam => scope >= PrivilegeScope::Team,
            Self::ResourceOwnership => scope.is_resource(),
        }
    }
}

impl FromStr for RoleType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "global" => Ok(Self::Global),
            "user-team" => Ok(Self::UserTeam),
            "resource-ownership" => Ok(Self::ResourceOwnership),
            _ => Err(AppError::Validation(format!(
                "unknown role type value '{value}'"
            ))),
        }
    }
}

/// Named bundle of privileges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: Option<String>,
    role_type: RoleType,
    privileges: BTreeSet<PrivilegeCode>,
}

impl Role {
    /// Creates a role after checking every privilege fits the role type.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: Option<String>,
        role_type: RoleType,
        privileges: impl IntoIterator<Item = PrivilegeCode>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name.into().trim())?;
        let privileges: BTreeSet<_> = privileges.into_iter().collect();

        let rejected: Vec<_> = privileges
            .iter()
            .filter(|privilege| !role_type.accepts(**privilege))
            .map(|privilege| privilege.as_str())
            .collect();
        if !rejected.is_empty() {
            return Err(AppError::Validation(format!(
                "{} roles cannot carry privileges [{}]",
                role_type.as_str(),
                rejected.join(", ")
            )));
        }

        Ok(Self {
            id,
            name,
            description: description.filter(|value| !value.trim().is_empty()),
            role_type,
            privileges,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the role type.
    #[must_use]
    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    /// Returns the unique privileges of the role.
    #[must_use]
    pub fn privileges(&self) -> &BTreeSet<PrivilegeCode> {
        &self.privileges
    }

    /// Fails unless the role has the expected type.
    pub fn expect_type(&self, expected: RoleType) -> AppResult<()> {
        if self.role_type != expected {
            return Err(AppError::Validation(format!(
                "role '{}' is a {} role, expected {}",
                self.name(),
                self.role_type.as_str(),
                expected.as_str()
            )));
        }

        Ok(())
    }
}
