//! Domain entities and invariants for team-scoped privilege resolution.

#![forbid(unsafe_code)]

mod authorization;
mod inheritance;
mod ownership;
mod privilege;
mod resource;
mod role;
mod security;

pub use authorization::{
    AccessFilter, AuthorizationDecision, AuthorizationSubject, EffectivePrivileges,
    OwnershipGrant, PrivilegeSources, authorize,
};
pub use inheritance::{UPWARD_INHERITANCE, implies, is_inherited, satisfying_privileges};
pub use ownership::{Ownership, OwnershipId};
pub use privilege::{
    PrivilegeAction, PrivilegeCatalog, PrivilegeCode, PrivilegeDefinition, PrivilegeScope,
};
pub use resource::ResourcePath;
pub use role::{Role, RoleId, RoleType};
pub use security::AuditAction;
