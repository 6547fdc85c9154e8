//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod route_policy;
mod security_admin_ports;
mod security_admin_service;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use route_policy::{RoutePolicy, RoutePolicyTable, SubjectRule, ValidatedRoutePolicy};
pub use security_admin_ports::{
    AssignMembershipInput, CreateRoleInput, GrantOwnershipInput, SbEnvironmentSummary,
    SecurityAdminRepository, TeamDefinition, TenantMembership, UserAccount,
};
pub use security_admin_service::{GLOBAL_ADMIN_ROLE_NAME, SecurityAdminService};
