//! Authorization requirements of every privileged route.
//!
//! Route templates are shared with the router so a path cannot drift from
//! its declared requirement.

use sbaa_application::{RoutePolicy, RoutePolicyTable, SubjectRule};
use sbaa_core::AppError;
use tracing::info;

pub const PRIVILEGES: &str = "/api/privileges";
pub const ROLES: &str = "/api/roles";
pub const ROLE: &str = "/api/roles/{role_id}";
pub const OWNERSHIPS: &str = "/api/ownerships";
pub const OWNERSHIP: &str = "/api/ownerships/{ownership_id}";
pub const USER_GLOBAL_ROLE: &str = "/api/users/{subject}/global-role";
pub const USER_TEAM_MEMBERSHIPS: &str = "/api/user-team-memberships";
pub const TEAMS: &str = "/api/teams";
pub const TEAM_OWNERSHIPS: &str = "/api/teams/{team_id}/ownerships";
pub const TEAM_MEMBERSHIPS: &str = "/api/teams/{team_id}/memberships";
pub const TEAM_SB_ENVIRONMENTS: &str = "/api/teams/{team_id}/sb-environments";
pub const TEAM_SB_ENVIRONMENT: &str = "/api/teams/{team_id}/sb-environments/{sb_environment_id}";

const TEAM_PARAM: &str = "team_id";

pub fn declared_route_policies() -> Vec<RoutePolicy> {
    let team = || SubjectRule::Team {
        team_param: TEAM_PARAM,
    };

    vec![
        RoutePolicy::new("GET", PRIVILEGES, "privilege:read", SubjectRule::Global),
        RoutePolicy::new("GET", ROLES, "role:read", SubjectRule::Global),
        RoutePolicy::new("POST", ROLES, "role:create", SubjectRule::Global),
        RoutePolicy::new("GET", ROLE, "role:read", SubjectRule::Global),
        RoutePolicy::new("DELETE", ROLE, "role:delete", SubjectRule::Global),
        RoutePolicy::new("POST", OWNERSHIPS, "ownership:create", SubjectRule::Global),
        RoutePolicy::new("DELETE", OWNERSHIP, "ownership:delete", SubjectRule::Global),
        RoutePolicy::new("PUT", USER_GLOBAL_ROLE, "user:update", SubjectRule::Global),
        RoutePolicy::new(
            "POST",
            USER_TEAM_MEMBERSHIPS,
            "user-team-membership:create",
            SubjectRule::Global,
        ),
        RoutePolicy::new(
            "DELETE",
            USER_TEAM_MEMBERSHIPS,
            "user-team-membership:delete",
            SubjectRule::Global,
        ),
        RoutePolicy::new("GET", TEAMS, "team:read", SubjectRule::Global),
        RoutePolicy::new("POST", TEAMS, "team:create", SubjectRule::Global),
        RoutePolicy::new("GET", TEAM_OWNERSHIPS, "team.ownership:read", team()),
        RoutePolicy::new(
            "GET",
            TEAM_MEMBERSHIPS,
            "team.user-team-membership:read",
            team(),
        ),
        RoutePolicy::new(
            "GET",
            TEAM_SB_ENVIRONMENTS,
            "team.sb-environment:read",
            SubjectRule::AnyInstance {
                team_param: TEAM_PARAM,
            },
        ),
        RoutePolicy::new(
            "GET",
            TEAM_SB_ENVIRONMENT,
            "team.sb-environment:read",
            SubjectRule::Resource {
                team_param: TEAM_PARAM,
                id_params: vec!["sb_environment_id"],
            },
        ),
    ]
}

/// Validates the declared table. Called before the listener is bound.
pub fn build_route_policy_table() -> Result<RoutePolicyTable, AppError> {
    let table = RoutePolicyTable::validate(declared_route_policies())?;
    info!(routes = table.len(), "route authorization table validated");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use sbaa_domain::PrivilegeCode;

    use super::{TEAM_SB_ENVIRONMENTS, build_route_policy_table, declared_route_policies};

    #[test]
    fn declared_table_is_valid() {
        let Ok(table) = build_route_policy_table() else {
            panic!("declared route table should validate");
        };
        assert_eq!(table.len(), declared_route_policies().len());
    }

    #[test]
    fn environment_listing_is_a_filtered_read() {
        let Ok(table) = build_route_policy_table() else {
            panic!("declared route table should validate");
        };
        let Some(policy) = table.lookup("GET", TEAM_SB_ENVIRONMENTS) else {
            panic!("environment listing should be declared");
        };
        assert_eq!(policy.privilege(), PrivilegeCode::TeamSbEnvironmentRead);
    }
}
