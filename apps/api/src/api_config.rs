use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use sbaa_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const MIN_BOOTSTRAP_TOKEN_LENGTH: usize = 16;

/// Backing store for security data and sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// PostgreSQL through sqlx, with migrations applied at startup.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// Process-local store. Everything is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageMode,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let storage = match env::var("SBAA_STORAGE")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StorageMode::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            "memory" => StorageMode::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "SBAA_STORAGE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };
        if migrate_only && storage == StorageMode::Memory {
            return Err(AppError::Validation(
                "the migrate command requires SBAA_STORAGE=postgres".to_owned(),
            ));
        }

        let frontend_url = frontend_origin(
            &env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned()),
        )?;

        let bootstrap_token = required_non_empty_env("AUTH_BOOTSTRAP_TOKEN")?;
        if bootstrap_token.len() < MIN_BOOTSTRAP_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "AUTH_BOOTSTRAP_TOKEN must be at least {MIN_BOOTSTRAP_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            migrate_only,
            storage,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Normalizes a frontend URL to the origin browsers send in `Origin`.
fn frontend_origin(value: &str) -> Result<String, AppError> {
    let url = Url::parse(value)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "FRONTEND_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url.origin().ascii_serialization())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
