use std::sync::Arc;

use sbaa_application::{AuthorizationService, RoutePolicyTable, SecurityAdminService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub route_policies: Arc<RoutePolicyTable>,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
