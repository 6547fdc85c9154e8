use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use sbaa_application::{AssignMembershipInput, CreateRoleInput, GrantOwnershipInput};
use sbaa_core::{TenantId, UserIdentity};
use sbaa_domain::{OwnershipId, PrivilegeCode, ResourcePath, RoleId, RoleType};

use crate::dto::{
    AssignGlobalRoleRequest, AssignMembershipRequest, CreateRoleRequest, GrantOwnershipRequest,
    MembershipResponse, OwnershipResponse, PrivilegeResponse, RemoveMembershipRequest,
    RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod memberships;
mod ownerships;
mod roles;

pub use memberships::{
    assign_global_role_handler, assign_membership_handler, remove_membership_handler,
};
pub use ownerships::{grant_ownership_handler, revoke_ownership_handler};
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_privileges_handler,
    list_roles_handler,
};
