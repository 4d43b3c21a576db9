use crate::insights::DEFAULT_JITTER_SEED;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let database_url = non_empty_var("DATABASE_URL");
        let snapshot_dir = non_empty_var("DASHBOARD_SNAPSHOT_DIR");
        let source = match (database_url, snapshot_dir) {
            (Some(url), _) => DataSourceConfig::Database { url },
            (None, Some(dir)) => DataSourceConfig::Snapshot {
                dir: PathBuf::from(dir),
            },
            (None, None) => return Err(ConfigError::MissingDataSource),
        };

        let jitter_seed = match non_empty_var("DASHBOARD_JITTER_SEED") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => seed,
                Err(_) => return Err(ConfigError::InvalidJitterSeed(raw)),
            },
            None => DEFAULT_JITTER_SEED,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig {
                source,
                jitter_seed,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the two tables come from and how the charts are jittered.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub source: DataSourceConfig,
    pub jitter_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    Database { url: String },
    Snapshot { dir: PathBuf },
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingDataSource,
    InvalidJitterSeed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingDataSource => write!(
                f,
                "set DATABASE_URL or DASHBOARD_SNAPSHOT_DIR to locate the dashboard tables"
            ),
            ConfigError::InvalidJitterSeed(raw) => {
                write!(f, "DASHBOARD_JITTER_SEED must be an unsigned integer, got '{raw}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingDataSource
            | ConfigError::InvalidJitterSeed(_) => None,
        }
    }
}
