use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::cors::CorsLayer;

use crate::{
    config::{self, AppConfig},
    database,
    error::Result,
    routes,
    services::{CatalogService, ContactService, ImageResolver, SettingsService},
    store::{CatalogStore, MessageStore, ObjectStore, PgStore, S3ObjectStore, SettingsStore},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub settings: SettingsService,
    pub contact: ContactService,
    pub images: ImageResolver,
    pub storefront_url: String,
}

impl AppState {
    /// Wires every service to one row store and one object store.
    pub fn new<S>(store: S, objects: Arc<dyn ObjectStore>, storefront_url: impl Into<String>) -> Self
    where
        S: CatalogStore + SettingsStore + MessageStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            catalog: CatalogService::new(store.clone()),
            settings: SettingsService::new(store.clone()),
            contact: ContactService::new(store),
            images: ImageResolver::new(objects),
            storefront_url: storefront_url.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    routes::create_router().with_state(state)
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let s3_client = config::load_s3_client(&config.storage).await?;
    let objects = S3ObjectStore::new(
        s3_client,
        config.storage.bucket.clone(),
        config.storage.assets_url.clone(),
    );

    let state = AppState::new(
        PgStore::new(pool),
        Arc::new(objects),
        config.storefront.public_url.clone(),
    );

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE])
        .expose_headers([http::HeaderName::from_static(routes::DEGRADED_HEADER)])
        .allow_origin(allowed_origins);

    let app = router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors);

    Ok(app)
}
