/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, ops::RangeInclusive, path::Path, time::Duration};

/// Work factors bcrypt accepts
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Longest access token lifetime accepted, one year
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 366;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub identity_mode: IdentityMode,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

/// How a request proves who is calling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Plain `username` request header, taken at face value
    #[default]
    Header,
    /// `Authorization: Bearer` access token issued by `/login`
    Token,
}

impl StorageSettings {
    pub fn pool_options(&self) -> cinelist_storage::PoolOptions {
        cinelist_storage::PoolOptions {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, lowest precedence first: `config.toml` (or `path`), variables
    /// prefixed with `CINELIST_` using `__` between sections, then the plain
    /// `PORT` and `DATABASE_URL` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(path, &vars)
    }

    /// Same as [`ServerConfig::load`] with an explicit set of variables
    /// standing in for the process environment
    pub fn load_from(path: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                // An explicit path must exist
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CINELIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone().into_iter().collect())),
        );

        if let Some(port) = vars.get("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT is not a valid port: {}", port)))?;
            settings = settings
                .set_override("server.port", i64::from(port))
                .map_err(|e| ServerError::Config(e.to_string()))?;
        }

        settings = settings
            .set_override_option("storage.database_url", vars.get("DATABASE_URL").cloned())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("server.port must not be 0".to_string()));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        if !BCRYPT_COST_RANGE.contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "auth.bcrypt_cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }

        if self.auth.jwt_expiration_hours == 0
            || self.auth.jwt_expiration_hours > MAX_JWT_EXPIRATION_HOURS
        {
            return Err(ServerError::Config(format!(
                "auth.jwt_expiration_hours must be between 1 and {}",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }

        if self.auth.identity_mode == IdentityMode::Token && self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required in token mode (set CINELIST_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
        busy_timeout_secs: default_busy_timeout_secs(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cinelist.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_secs() -> u64 {
    30
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        identity_mode: IdentityMode::default(),
        bcrypt_cost: default_bcrypt_cost(),
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}
