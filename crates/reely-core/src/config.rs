//! Configuration module
//!
//! Environment-driven configuration for the upload service: HTTP server,
//! database, storage mode, media tool paths, and size caps. The `Config`
//! value is constructed once at startup and passed around immutably.

use std::env;

use crate::models::StorageMode;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;

/// Base configuration shared by the HTTP service.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Upload service configuration.
#[derive(Clone, Debug)]
pub struct UploadServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_mode: StorageMode,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub assets_root: Option<String>,
    pub public_base_url: Option<String>,
    // Media processing configuration
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout_secs: u64,
    // Publishing configuration
    pub presign_ttl_secs: u64,
    pub random_name_bytes: usize,
}

/// Application configuration (upload service).
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadServiceConfig>);

impl Config {
    fn inner(&self) -> &UploadServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploadServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.inner().storage_mode
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn assets_root(&self) -> Option<&str> {
        self.inner().assets_root.as_deref()
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.inner().public_base_url.as_deref()
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn tool_timeout_secs(&self) -> u64 {
        self.inner().tool_timeout_secs
    }

    pub fn presign_ttl_secs(&self) -> u64 {
        self.inner().presign_ttl_secs
    }

    pub fn random_name_bytes(&self) -> usize {
        self.inner().random_name_bytes
    }
}

impl UploadServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_THUMBNAIL_SIZE_MB: usize = 10;
        const MAX_VIDEO_SIZE_MB: usize = 1024;
        const TOOL_TIMEOUT_SECS: u64 = 60;
        const PRESIGN_TTL_SECS: u64 = 600;
        const RANDOM_NAME_BYTES: usize = 16;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
        };

        let storage_mode = env::var("STORAGE_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<StorageMode>()?;

        let config = UploadServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_mode,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            assets_root: env::var("ASSETS_ROOT").ok(),
            public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            max_thumbnail_size_bytes: env::var("MAX_THUMBNAIL_SIZE_MB")
                .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_THUMBNAIL_SIZE_MB)
                * 1024
                * 1024,
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            tool_timeout_secs: env::var("TOOL_TIMEOUT_SECS")
                .unwrap_or_else(|_| TOOL_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(TOOL_TIMEOUT_SECS),
            presign_ttl_secs: env::var("PRESIGN_TTL_SECS")
                .unwrap_or_else(|_| PRESIGN_TTL_SECS.to_string())
                .parse()
                .unwrap_or(PRESIGN_TTL_SECS),
            random_name_bytes: env::var("RANDOM_NAME_BYTES")
                .unwrap_or_else(|_| RANDOM_NAME_BYTES.to_string())
                .parse()
                .unwrap_or(RANDOM_NAME_BYTES),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.random_name_bytes != 16 && self.random_name_bytes != 32 {
            return Err(anyhow::anyhow!("RANDOM_NAME_BYTES must be 16 or 32"));
        }

        // Mode-specific requirements
        match self.storage_mode {
            StorageMode::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using the s3 storage mode"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using the s3 storage mode"
                    ));
                }
            }
            StorageMode::Local | StorageMode::Inline => {
                if self.assets_root.is_none() {
                    return Err(anyhow::anyhow!(
                        "ASSETS_ROOT must be set when using the {} storage mode",
                        self.storage_mode
                    ));
                }
                if self.public_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "PUBLIC_BASE_URL must be set when using the {} storage mode",
                        self.storage_mode
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> UploadServiceConfig {
        UploadServiceConfig {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 20,
                db_timeout_seconds: 30,
                jwt_secret: "a".repeat(32),
                jwt_expiry_hours: 24,
                environment: "development".to_string(),
            },
            database_url: "postgresql://localhost/reely".to_string(),
            storage_mode: StorageMode::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            assets_root: Some("./assets".to_string()),
            public_base_url: Some("http://localhost:4000".to_string()),
            max_thumbnail_size_bytes: 10 * 1024 * 1024,
            max_video_size_bytes: 1024 * 1024 * 1024,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            tool_timeout_secs: 60,
            presign_ttl_secs: 600,
            random_name_bytes: 16,
        }
    }

    #[test]
    fn test_validate_accepts_local_mode() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = valid_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = valid_config();
        config.database_url = "mysql://localhost/reely".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_s3_mode_requires_bucket_and_region() {
        let mut config = valid_config();
        config.storage_mode = StorageMode::S3;
        assert!(config.validate().is_err());

        config.s3_bucket = Some("reely-media".to_string());
        assert!(config.validate().is_err());

        config.s3_region = Some("us-east-2".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_inline_mode_requires_assets_root() {
        let mut config = valid_config();
        config.storage_mode = StorageMode::Inline;
        config.assets_root = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_odd_name_length() {
        let mut config = valid_config();
        config.random_name_bytes = 20;
        assert!(config.validate().is_err());
    }
}
