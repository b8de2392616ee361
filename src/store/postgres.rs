use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    database,
    error::Result,
    models::{
        Category, ContactMessage, MessageFlag, NewContactMessage, ProductFilter, ProductRow,
        Settings, SettingsRow, UpdateCategoryRequest, Window,
    },
    queries::{category_queries, message_queries, products_queries, settings_queries},
    store::{CatalogStore, MessageStore, SettingsStore},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn product_ids_in_categories(&self, category_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        category_queries::get_product_ids_in_categories(&self.pool, category_ids).await
    }

    async fn query_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<(Vec<ProductRow>, i64)> {
        let total = products_queries::count_products(&self.pool, filter).await?;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let rows = products_queries::search_products(&self.pool, filter, window).await?;

        Ok((rows, total))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRow>> {
        products_queries::find_by_id(&self.pool, id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        category_queries::get_all(&self.pool).await
    }

    async fn category_ids_for_product(&self, product_id: Uuid) -> Result<Vec<Uuid>> {
        category_queries::get_product_category_ids(&self.pool, product_id).await
    }

    async fn delete_product_categories(&self, product_id: Uuid) -> Result<()> {
        category_queries::clear_product_categories(&self.pool, product_id).await
    }

    async fn insert_product_categories(
        &self,
        product_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<()> {
        category_queries::insert_product_categories(&self.pool, product_id, category_ids).await
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
        category_queries::create_category(&self.pool, name, slug).await
    }

    async fn update_category(
        &self,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        category_queries::update_category(&self.pool, id, req).await
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        category_queries::delete_category(&self.pool, id).await
    }

    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn find_settings(&self) -> Result<Option<SettingsRow>> {
        settings_queries::find_first(&self.pool).await
    }

    async fn insert_settings(&self, settings: &Settings) -> Result<SettingsRow> {
        settings_queries::insert_settings(&self.pool, settings).await
    }

    async fn update_settings(&self, id: Uuid, settings: &Settings) -> Result<SettingsRow> {
        settings_queries::update_settings(&self.pool, id, settings).await
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: &NewContactMessage) -> Result<ContactMessage> {
        message_queries::create_message(&self.pool, message).await
    }

    async fn list_messages(&self, limit: i64, offset: i64) -> Result<Vec<ContactMessage>> {
        message_queries::list_messages(&self.pool, limit, offset).await
    }

    async fn set_message_flag(&self, id: Uuid, flag: MessageFlag) -> Result<bool> {
        message_queries::set_flag(&self.pool, id, flag).await
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool> {
        message_queries::delete_message(&self.pool, id).await
    }
}
