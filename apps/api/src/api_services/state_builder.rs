use std::sync::Arc;

use sbaa_application::{AuthorizationService, RoutePolicyTable, SecurityAdminService};
use sbaa_infrastructure::{
    InMemorySecurityStore, PostgresAuditRepository, PostgresAuthorizationRepository,
    PostgresSecurityAdminRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Services wired to one storage backend.
#[derive(Clone)]
pub struct SecurityServices {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
}

pub fn postgres_services(pool: &PgPool) -> SecurityServices {
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let authorization_service = AuthorizationService::new(
        Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        audit_repository.clone(),
    );
    let security_admin_service = SecurityAdminService::new(
        authorization_service.clone(),
        Arc::new(PostgresSecurityAdminRepository::new(pool.clone())),
        audit_repository,
    );

    SecurityServices {
        authorization_service,
        security_admin_service,
    }
}

pub fn in_memory_services(store: Arc<InMemorySecurityStore>) -> SecurityServices {
    let authorization_service = AuthorizationService::new(store.clone(), store.clone());
    let security_admin_service =
        SecurityAdminService::new(authorization_service.clone(), store.clone(), store);

    SecurityServices {
        authorization_service,
        security_admin_service,
    }
}

pub fn build_app_state(
    services: SecurityServices,
    route_policies: RoutePolicyTable,
    config: &ApiConfig,
) -> AppState {
    AppState {
        authorization_service: services.authorization_service,
        security_admin_service: services.security_admin_service,
        route_policies: Arc::new(route_policies),
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
