mod app_config;
mod s3_config;

pub use app_config::{
    AppConfig, CorsConfig, DEFAULT_BUCKET, DatabaseConfig, ServerConfig, StorageConfig,
    StorefrontConfig,
};
pub use s3_config::*;
