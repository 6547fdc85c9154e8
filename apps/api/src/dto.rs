use sbaa_application::{SbEnvironmentSummary, TeamDefinition, TenantMembership};
use sbaa_core::UserIdentity;
use sbaa_domain::{EffectivePrivileges, Ownership, PrivilegeDefinition, Role};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub privileges: Vec<String>,
}

impl UserIdentityResponse {
    pub fn new(identity: &UserIdentity, privileges: &EffectivePrivileges) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(str::to_owned),
            privileges: privileges
                .global()
                .iter()
                .map(|code| code.as_str().to_owned())
                .collect(),
        }
    }
}

/// API representation of a catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/privilege-response.ts"
)]
pub struct PrivilegeResponse {
    pub code: String,
    pub name: String,
    pub description: String,
    pub scope: String,
}

impl From<&PrivilegeDefinition> for PrivilegeResponse {
    fn from(value: &PrivilegeDefinition) -> Self {
        Self {
            code: value.key.to_owned(),
            name: value.name.to_owned(),
            description: value.description.to_owned(),
            scope: value.scope.as_str().to_owned(),
        }
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub role_type: String,
    pub privileges: Vec<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: Option<String>,
    pub role_type: String,
    pub privileges: Vec<String>,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
            role_type: value.role_type().as_str().to_owned(),
            privileges: value
                .privileges()
                .iter()
                .map(|code| code.as_str().to_owned())
                .collect(),
        }
    }
}

/// Incoming payload for granting a resource to a team.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-ownership-request.ts"
)]
pub struct GrantOwnershipRequest {
    pub team_id: String,
    pub role_id: String,
    /// Resource ancestry ids, environment first.
    pub resource: Vec<i64>,
}

/// API representation of an ownership.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ownership-response.ts"
)]
pub struct OwnershipResponse {
    pub ownership_id: String,
    pub team_id: String,
    pub role_id: String,
    pub resource: Vec<i64>,
    pub resource_label: String,
    pub created_at: String,
    pub revoked_at: Option<String>,
}

impl From<Ownership> for OwnershipResponse {
    fn from(value: Ownership) -> Self {
        Self {
            ownership_id: value.id().to_string(),
            team_id: value.tenant_id().to_string(),
            role_id: value.role_id().to_string(),
            resource: value.resource().ids().to_vec(),
            resource_label: value.resource().to_string(),
            created_at: value.created_at().to_rfc3339(),
            revoked_at: value.deleted_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Incoming payload for adding a user to a team.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-membership-request.ts"
)]
pub struct AssignMembershipRequest {
    pub team_id: String,
    pub subject: String,
    pub role_id: Option<String>,
}

/// Incoming payload for removing a user from a team.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/remove-membership-request.ts"
)]
pub struct RemoveMembershipRequest {
    pub team_id: String,
    pub subject: String,
}

/// API representation of a team membership.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/membership-response.ts"
)]
pub struct MembershipResponse {
    pub team_id: String,
    pub subject: String,
    pub role_id: Option<String>,
}

impl From<TenantMembership> for MembershipResponse {
    fn from(value: TenantMembership) -> Self {
        Self {
            team_id: value.tenant_id.to_string(),
            subject: value.subject,
            role_id: value.role_id.map(|role_id| role_id.to_string()),
        }
    }
}

/// Incoming payload for setting or clearing a user's global role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-global-role-request.ts"
)]
pub struct AssignGlobalRoleRequest {
    pub role_id: Option<String>,
}

/// Incoming payload for team creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-team-request.ts"
)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// API representation of a team.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/team-response.ts"
)]
pub struct TeamResponse {
    pub team_id: String,
    pub name: String,
}

impl From<TeamDefinition> for TeamResponse {
    fn from(value: TeamDefinition) -> Self {
        Self {
            team_id: value.tenant_id.to_string(),
            name: value.name,
        }
    }
}

/// API representation of a Starting Blocks environment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sb-environment-response.ts"
)]
pub struct SbEnvironmentResponse {
    pub sb_environment_id: i64,
    pub name: String,
}

impl From<SbEnvironmentSummary> for SbEnvironmentResponse {
    fn from(value: SbEnvironmentSummary) -> Self {
        Self {
            sb_environment_id: value.id,
            name: value.name,
        }
    }
}

/// Resources one privilege covers.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resource-privilege-response.ts"
)]
pub struct ResourcePrivilegeResponse {
    pub privilege: String,
    pub resources: Vec<Vec<i64>>,
}

/// Effective privileges of the signed-in user in one team.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-privileges-response.ts"
)]
pub struct EffectivePrivilegesResponse {
    pub team_id: String,
    pub global: Vec<String>,
    pub team: Vec<String>,
    pub resources: Vec<ResourcePrivilegeResponse>,
}

impl EffectivePrivilegesResponse {
    pub fn new(team_id: String, privileges: &EffectivePrivileges) -> Self {
        Self {
            team_id,
            global: privileges
                .global()
                .iter()
                .map(|code| code.as_str().to_owned())
                .collect(),
            team: privileges
                .team()
                .iter()
                .map(|code| code.as_str().to_owned())
                .collect(),
            resources: privileges
                .resources()
                .iter()
                .map(|(code, paths)| ResourcePrivilegeResponse {
                    privilege: code.as_str().to_owned(),
                    resources: paths.iter().map(|path| path.ids().to_vec()).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use sbaa_domain::{PrivilegeCode, Role, RoleId, RoleType};

    use super::{
        AssignGlobalRoleRequest, AssignMembershipRequest, CreateRoleRequest, CreateTeamRequest,
        EffectivePrivilegesResponse, GrantOwnershipRequest, HealthResponse, MembershipResponse,
        OwnershipResponse, PrivilegeResponse, RemoveMembershipRequest, ResourcePrivilegeResponse,
        RoleResponse, SbEnvironmentResponse, TeamResponse, UserIdentityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;
        PrivilegeResponse::export(&config)?;
        CreateRoleRequest::export(&config)?;
        RoleResponse::export(&config)?;
        GrantOwnershipRequest::export(&config)?;
        OwnershipResponse::export(&config)?;
        AssignMembershipRequest::export(&config)?;
        RemoveMembershipRequest::export(&config)?;
        MembershipResponse::export(&config)?;
        AssignGlobalRoleRequest::export(&config)?;
        CreateTeamRequest::export(&config)?;
        TeamResponse::export(&config)?;
        SbEnvironmentResponse::export(&config)?;
        ResourcePrivilegeResponse::export(&config)?;
        EffectivePrivilegesResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn role_response_lists_catalog_keys() {
        let Ok(role) = Role::new(
            RoleId::new(),
            "Viewer",
            None,
            RoleType::UserTeam,
            [PrivilegeCode::TeamSbEnvironmentRead],
        ) else {
            panic!("viewer role should be valid");
        };

        let response = RoleResponse::from(role);
        assert_eq!(response.role_type, "user-team");
        assert_eq!(response.privileges, vec!["team.sb-environment:read"]);
    }
}
