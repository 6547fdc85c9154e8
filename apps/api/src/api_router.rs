use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use sbaa_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::route_policies as routes;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

#[cfg(test)]
mod tests;

pub fn build_router<Store>(
    app_state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    // Every route here must have an entry in the route policy table.
    let gated_routes = Router::new()
        .route(
            routes::PRIVILEGES,
            get(handlers::security::list_privileges_handler),
        )
        .route(
            routes::ROLES,
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            routes::ROLE,
            get(handlers::security::get_role_handler)
                .delete(handlers::security::delete_role_handler),
        )
        .route(
            routes::OWNERSHIPS,
            post(handlers::security::grant_ownership_handler),
        )
        .route(
            routes::OWNERSHIP,
            delete(handlers::security::revoke_ownership_handler),
        )
        .route(
            routes::USER_GLOBAL_ROLE,
            put(handlers::security::assign_global_role_handler),
        )
        .route(
            routes::USER_TEAM_MEMBERSHIPS,
            post(handlers::security::assign_membership_handler)
                .delete(handlers::security::remove_membership_handler),
        )
        .route(
            routes::TEAMS,
            get(handlers::teams::list_teams_handler).post(handlers::teams::create_team_handler),
        )
        .route(
            routes::TEAM_OWNERSHIPS,
            get(handlers::teams::list_team_ownerships_handler),
        )
        .route(
            routes::TEAM_MEMBERSHIPS,
            get(handlers::teams::list_team_memberships_handler),
        )
        .route(
            routes::TEAM_SB_ENVIRONMENTS,
            get(handlers::teams::list_team_sb_environments_handler),
        )
        .route(
            routes::TEAM_SB_ENVIRONMENT,
            get(handlers::teams::get_team_sb_environment_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::authorize_route,
        ))
        .route_layer(from_fn(middleware::require_auth));

    let authenticated_routes = Router::new()
        .route(
            "/api/teams/{team_id}/privileges",
            get(handlers::teams::team_privileges_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = cors::build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(gated_routes)
        .merge(authenticated_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
