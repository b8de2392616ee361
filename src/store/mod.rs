//! Seams to the external row store and object store.
//!
//! Services only see these traits; `PgStore` and `S3ObjectStore` back them in
//! production and the in-memory implementations back them in tests.

mod memory;
mod postgres;
mod s3;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        Category, ContactMessage, MessageFlag, NewContactMessage, ProductFilter, ProductRow,
        Settings, SettingsRow, UpdateCategoryRequest, Window,
    },
};

pub use memory::{MemoryObjectStore, MemoryStore};
pub use postgres::PgStore;
pub use s3::S3ObjectStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Ids of products linked to any of the given categories.
    async fn product_ids_in_categories(&self, category_ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// One window of matching rows, newest first, plus the exact number of
    /// rows matching `filter` before the window is applied.
    async fn query_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<(Vec<ProductRow>, i64)>;

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRow>>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn category_ids_for_product(&self, product_id: Uuid) -> Result<Vec<Uuid>>;

    async fn delete_product_categories(&self, product_id: Uuid) -> Result<()>;

    async fn insert_product_categories(&self, product_id: Uuid, category_ids: &[Uuid])
    -> Result<()>;

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category>;

    async fn update_category(&self, id: Uuid, req: &UpdateCategoryRequest)
    -> Result<Option<Category>>;

    async fn delete_category(&self, id: Uuid) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn find_settings(&self) -> Result<Option<SettingsRow>>;

    async fn insert_settings(&self, settings: &Settings) -> Result<SettingsRow>;

    async fn update_settings(&self, id: Uuid, settings: &Settings) -> Result<SettingsRow>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: &NewContactMessage) -> Result<ContactMessage>;

    async fn list_messages(&self, limit: i64, offset: i64) -> Result<Vec<ContactMessage>>;

    /// Returns false when no message has the given id.
    async fn set_message_flag(&self, id: Uuid, flag: MessageFlag) -> Result<bool>;

    async fn delete_message(&self, id: Uuid) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control: String,
    pub upsert: bool,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the container holding product images; it appears as a path
    /// segment in every public URL.
    fn bucket(&self) -> &str;

    /// Stores `bytes` under `path` and returns the stored path.
    async fn upload(&self, path: &str, bytes: Vec<u8>, options: &UploadOptions) -> Result<String>;

    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Public URL for a stored path. Never fails; may be empty.
    fn public_url(&self, path: &str) -> String;
}
