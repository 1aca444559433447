//! Configuration for the order board

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Order board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Order store configuration
    pub database: DatabaseConfig,
    /// Kitchen notifier configuration
    pub notifier: NotifierConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

/// Order store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` URL, or `memory` for a non-durable in-process store
    pub url: String,
    /// Connection cap for the pool
    pub max_connections: u32,
}

/// Kitchen notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Events buffered per kitchen connection before it starts skipping
    pub channel_capacity: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight requests
    pub max_age_seconds: u64,
}

/// Monitoring and metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Enable Prometheus metrics
    pub metrics_enabled: bool,
    /// Metrics endpoint path
    pub metrics_path: String,
    /// Health check endpoint path
    pub health_path: String,
}

/// Value of `database.url` that selects the in-process store
pub const MEMORY_DATABASE: &str = "memory";

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                timeout_seconds: 30,
                max_body_size: 64 * 1024, // 64KB
            },
            database: DatabaseConfig {
                url: "sqlite://database.db".to_string(),
                max_connections: 5,
            },
            notifier: NotifierConfig {
                channel_capacity: 256,
            },
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec!["*".to_string()],
                allowed_methods: vec![
                    "GET".to_string(),
                    "POST".to_string(),
                    "OPTIONS".to_string(),
                ],
                allowed_headers: vec!["Content-Type".to_string()],
                max_age_seconds: 86400, // 24 hours
            },
            monitoring: MonitoringConfig {
                metrics_enabled: true,
                metrics_path: "/metrics".to_string(),
                health_path: "/health".to_string(),
            },
        }
    }
}

impl BoardConfig {
    /// Load configuration: defaults, then the file at `path` if it exists,
    /// then `ORDER_BOARD__SECTION__KEY` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?)
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("ORDER_BOARD").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Get server address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the in-process store was requested
    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.database.url == MEMORY_DATABASE
    }
}
