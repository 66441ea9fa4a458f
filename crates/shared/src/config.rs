//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Password hashing cost.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built front end, served with an `index.html` fallback.
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Single origin allowed to call the API with credentials.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            cors_origin: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://...` or `postgres://...`).
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://tally.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Where sessions live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// Persisted in the `sessions` table; survives restarts.
    #[default]
    Database,
    /// Process memory; lost on restart.
    Memory,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
    /// Mark the cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
    /// Session backend.
    #[serde(default)]
    pub store: SessionStoreKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_days: default_ttl_days(),
            secure: false,
            store: SessionStoreKind::default(),
        }
    }
}

fn default_cookie_name() -> String {
    "tally_session".to_string()
}

fn default_ttl_days() -> i64 {
    30
}

/// Argon2 cost parameters for new password hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

/// Outcome for the loser of a concurrent first read of the same month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthConflictPolicy {
    /// Re-read and return the row the winner created.
    #[default]
    ReturnExisting,
    /// Fail with a conflict error.
    Reject,
}

/// Ledger behaviour.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LedgerConfig {
    /// Month read-or-create race resolution.
    #[serde(default)]
    pub month_conflict_policy: MonthConflictPolicy,
}

/// Log output configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
