//! Configuration module
//!
//! Environment-driven settings for the HTTP server, the Postgres pool and the blob store.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 25;
const MIN_CONNECTIONS: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_LIFETIME_SECS: u64 = 3600;
const IDLE_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_REGION: &str = "eu-central-1";
const PRESIGN_EXPIRY_SECS: u64 = 3600;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SHUTDOWN_TIMEOUT_SECS: u64 = 20;

/// Server-wide settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    pub log_format: String,
}

/// Postgres pool settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub timeout_seconds: u64,
    pub max_lifetime_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Blob store settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    /// Endpoint reachable by clients when it differs from the one the server uses.
    pub s3_public_endpoint: Option<String>,
    pub memory_base_url: String,
    pub presign_expiry_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base: BaseConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CatalogConfig>);

impl Config {
    fn inner(&self) -> &CatalogConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = CatalogConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().base.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().base.shutdown_timeout_secs)
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database.url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().database.max_connections
    }

    pub fn db_min_connections(&self) -> u32 {
        self.inner().database.min_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().database.timeout_seconds
    }

    pub fn db_max_lifetime_secs(&self) -> u64 {
        self.inner().database.max_lifetime_secs
    }

    pub fn db_idle_timeout_secs(&self) -> u64 {
        self.inner().database.idle_timeout_secs
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().storage.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().storage.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().storage.s3_endpoint.as_deref()
    }

    pub fn s3_public_endpoint(&self) -> Option<&str> {
        self.inner().storage.s3_public_endpoint.as_deref()
    }

    pub fn memory_storage_base_url(&self) -> &str {
        &self.inner().storage.memory_base_url
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.inner().storage.presign_expiry_secs)
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let config = CatalogConfig {
            base: BaseConfig {
                server_port,
                cors_origins,
                environment,
                request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS),
                shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", SHUTDOWN_TIMEOUT_SECS),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "compact".to_string())
                    .to_lowercase(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
                max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
                min_connections: env_or("DB_MIN_CONNECTIONS", MIN_CONNECTIONS),
                timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
                max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", MAX_LIFETIME_SECS),
                idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", IDLE_TIMEOUT_SECS),
            },
            storage: StorageConfig {
                backend,
                s3_bucket: non_empty("S3_BUCKET"),
                s3_region: non_empty("S3_REGION")
                    .or_else(|| non_empty("AWS_REGION"))
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                s3_endpoint: non_empty("S3_ENDPOINT"),
                s3_public_endpoint: non_empty("S3_PUBLIC_ENDPOINT"),
                memory_base_url: non_empty("MEMORY_STORAGE_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{}/storage", server_port)),
                presign_expiry_secs: env_or("PRESIGN_EXPIRY_SECS", PRESIGN_EXPIRY_SECS),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(anyhow::anyhow!(
                "DB_MIN_CONNECTIONS cannot exceed DB_MAX_CONNECTIONS"
            ));
        }

        if is_production_env(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production; list the allowed origins explicitly"
            ));
        }

        if self.storage.presign_expiry_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be positive"));
        }

        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be positive"));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if is_production_env(&self.base.environment) {
                    return Err(anyhow::anyhow!(
                        "memory storage backend is not allowed in production"
                    ));
                }
            }
        }

        Ok(())
    }
}
