use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    #[command(flatten)]
    pub health: HealthConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Seed the users table from a delimited file and exit
    ImportUsers {
        /// Path to the file (header: id,displayName,createdAt,lastLoginAt)
        #[arg(default_value = "User-Info.csv")]
        path: PathBuf,
    },
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database host
    #[arg(id = "db_host", long = "db-host", env = "POSTGRES_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(id = "db_port", long = "db-port", env = "POSTGRES_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", env = "POSTGRES_USER", default_value = "postgres")]
    pub username: String,

    /// Database password
    #[arg(long = "db-password", env = "POSTGRES_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database name
    #[arg(long = "db-name", env = "POSTGRES_DB", default_value = "postgres")]
    pub name: String,

    /// Maximum number of pooled connections
    #[arg(long = "db-max-connections", env = "DM_DB_MAX_CONNECTIONS", default_value_t = 20)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection before failing
    #[arg(long = "db-acquire-timeout-secs", env = "DM_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "DM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public API
    #[arg(long, env = "DM_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Port for liveness and readiness probes
    #[arg(long, env = "DM_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work during shutdown
    #[arg(long, env = "DM_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "DM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are exported only when set
    #[arg(long, env = "DM_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the readiness database probe
    #[arg(long = "health-db-timeout-ms", env = "DM_HEALTH_DB_TIMEOUT_MS", default_value_t = 2000)]
    pub db_timeout_ms: u64,
}

impl Config {
    /// Loads `.env` (if present) and parses flags and environment variables.
    #[must_use]
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
