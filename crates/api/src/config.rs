use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Startup configuration failure. The binary refuses to start on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
}

/// Read `key` and parse it, falling back to `default` when unset.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Which browser origins may call the API.
#[derive(Debug, Clone)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list. `*` anywhere in it means any origin.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if entries.is_empty() || entries.contains(&"*") {
            return Ok(CorsOrigins::Any);
        }

        entries
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    key: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CorsOrigins::List)
    }
}

/// Credentials for the admin account created at startup if it does not exist.
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server configuration loaded once from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub db_max_connections: u32,
    /// JWT signing secret and token lifetimes.
    pub jwt: JwtConfig,
    pub admin_seed: Option<AdminSeed>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Required | Default         |
    /// |------------------------|----------|-----------------|
    /// | `JWT_SECRET`           | **yes**  | --              |
    /// | `DATABASE_URL`         | **yes**  | --              |
    /// | `HOST`                 | no       | `0.0.0.0`       |
    /// | `PORT`                 | no       | `5000`          |
    /// | `CORS_ORIGINS`         | no       | `*`             |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`            |
    /// | `DB_MAX_CONNECTIONS`   | no       | `20`            |
    /// | `ADMIN_EMAIL`          | no       | --              |
    /// | `ADMIN_PASSWORD`       | no       | --              |
    /// | `ADMIN_NAME`           | no       | `Administrador` |
    ///
    /// See [`JwtConfig::from_env`] for the token lifetime variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt = JwtConfig::from_env()?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5000)?;
        let cors_origins =
            CorsOrigins::parse(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()))?;
        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", 20)?;

        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".into()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            jwt,
            admin_seed,
        })
    }
}
