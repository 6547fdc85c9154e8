mod records;
mod repositories;

pub use records::{
    AssignMembershipInput, CreateRoleInput, GrantOwnershipInput, SbEnvironmentSummary,
    TeamDefinition, TenantMembership, UserAccount,
};
pub use repositories::SecurityAdminRepository;
