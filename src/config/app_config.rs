use crate::error::{AppError, Result};
use std::env;

pub const DEFAULT_BUCKET: &str = "product-images";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub assets_url: String,
    pub region: String,
}

/// Public origin of the shop front, used to build product page links.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let allowed_origins: Vec<String> = env::var("FRONTEND_URL")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_url = match env::var("STOREFRONT_URL") {
            Ok(url) => url,
            Err(_) => allowed_origins.first().cloned().ok_or_else(|| {
                AppError::ConfigError("STOREFRONT_URL or FRONTEND_URL must be set".to_string())
            })?,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig { allowed_origins },
            storage: StorageConfig {
                bucket: env::var("S3_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
                assets_url: env::var("ASSETS_URL")
                    .map_err(|_| AppError::ConfigError("ASSETS_URL not set".to_string()))?,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            },
            storefront: StorefrontConfig { public_url },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
