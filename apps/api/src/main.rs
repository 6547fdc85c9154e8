//! Starting Blocks admin API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod route_policies;
mod state;

use std::sync::Arc;

use axum::Router;
use sbaa_core::AppError;
use sbaa_infrastructure::InMemorySecurityStore;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StorageMode, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_app_state, build_memory_session_layer, build_postgres_session_layer,
    connect_and_migrate, in_memory_services, postgres_services,
};
use crate::route_policies::build_route_policy_table;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let route_policies = build_route_policy_table()?;

    let app = match &config.storage {
        StorageMode::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            let state = build_app_state(postgres_services(&pool), route_policies, &config);
            let session_layer = build_postgres_session_layer(pool, config.cookie_secure).await?;
            build_router(state, session_layer)?
        }
        StorageMode::Memory => {
            warn!("in-memory storage selected, all data is lost on restart");
            let services = in_memory_services(Arc::new(InMemorySecurityStore::new()));
            let state = build_app_state(services, route_policies, &config);
            build_router(state, build_memory_session_layer(config.cookie_secure))?
        }
    };

    serve(app, &config).await
}

async fn serve(app: Router, config: &ApiConfig) -> Result<(), AppError> {
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "sbaa-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
