//! In-process backends used by the test suite and local demos.
//!
//! Both stores can be switched offline, or told to fail a single operation,
//! so the degraded paths of the services can be exercised without a database.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        Category, ContactMessage, MessageFlag, NewContactMessage, ProductCategory, ProductFilter,
        ProductRow, Settings, SettingsRow, UpdateCategoryRequest, Window,
    },
    store::{CatalogStore, MessageStore, ObjectStore, SettingsStore, UploadOptions, s3::encode_path},
};

#[derive(Debug, Default)]
struct CatalogState {
    // insertion order doubles as the natural row order
    products: Vec<ProductRow>,
    categories: Vec<Category>,
    links: Vec<ProductCategory>,
    settings: Option<SettingsRow>,
    messages: Vec<ContactMessage>,
    offline: bool,
    failing: HashSet<&'static str>,
}

impl CatalogState {
    fn guard(&self, op: &'static str) -> Result<()> {
        if self.offline || self.failing.contains(op) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails as if the database were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Makes only the named trait operation fail, e.g. `"insert_product_categories"`.
    pub async fn fail_operation(&self, op: &'static str) {
        self.state.write().await.failing.insert(op);
    }

    pub async fn insert_product(&self, row: ProductRow) -> Uuid {
        let id = row.id;
        self.state.write().await.products.push(row);
        id
    }

    /// Adds a minimal product created at `created_at`.
    pub async fn add_product(&self, name: &str, created_at: DateTime<Utc>) -> Uuid {
        self.insert_product(ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: None,
            stock_quantity: Some(1),
            brand: None,
            color: None,
            size: None,
            code: None,
            image_urls: None,
            image_url: None,
            created_at,
        })
        .await
    }

    pub async fn link(&self, product_id: Uuid, category_id: Uuid) {
        let mut state = self.state.write().await;
        let link = ProductCategory {
            product_id,
            category_id,
        };
        if !state.links.contains(&link) {
            state.links.push(link);
        }
    }
}

fn matches_search(row: &ProductRow, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [Some(&row.name), row.code.as_ref(), row.brand.as_ref()]
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn product_ids_in_categories(&self, category_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let state = self.state.read().await;
        state.guard("product_ids_in_categories")?;

        let mut seen = HashSet::new();
        Ok(state
            .links
            .iter()
            .filter(|link| category_ids.contains(&link.category_id))
            .map(|link| link.product_id)
            .filter(|id| seen.insert(*id))
            .collect())
    }

    async fn query_products(
        &self,
        filter: &ProductFilter,
        window: Window,
    ) -> Result<(Vec<ProductRow>, i64)> {
        let state = self.state.read().await;
        state.guard("query_products")?;

        let mut matching: Vec<&ProductRow> = state
            .products
            .iter()
            .filter(|row| filter.ids.as_ref().is_none_or(|ids| ids.contains(&row.id)))
            .filter(|row| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(row, needle))
            })
            .collect();

        // stable: equal timestamps keep insertion order
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((rows, total))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRow>> {
        let state = self.state.read().await;
        state.guard("find_product")?;

        Ok(state.products.iter().find(|row| row.id == id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        state.guard("list_categories")?;

        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category_ids_for_product(&self, product_id: Uuid) -> Result<Vec<Uuid>> {
        let state = self.state.read().await;
        state.guard("category_ids_for_product")?;

        Ok(state
            .links
            .iter()
            .filter(|link| link.product_id == product_id)
            .map(|link| link.category_id)
            .collect())
    }

    async fn delete_product_categories(&self, product_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.guard("delete_product_categories")?;

        state.links.retain(|link| link.product_id != product_id);
        Ok(())
    }

    async fn insert_product_categories(
        &self,
        product_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.guard("insert_product_categories")?;

        for category_id in category_ids {
            let link = ProductCategory {
                product_id,
                category_id: *category_id,
            };
            if !state.links.contains(&link) {
                state.links.push(link);
            }
        }
        Ok(())
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
        let mut state = self.state.write().await;
        state.guard("create_category")?;

        if state.categories.iter().any(|c| c.slug == slug) {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(format!(
                "duplicate category slug {}",
                slug
            ))));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        let mut state = self.state.write().await;
        state.guard("update_category")?;

        if let Some(ref slug) = req.slug
            && state.categories.iter().any(|c| c.id != id && &c.slug == slug)
        {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(format!(
                "duplicate category slug {}",
                slug
            ))));
        }

        let Some(category) = state.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(ref name) = req.name {
            category.name = name.clone();
        }
        if let Some(ref slug) = req.slug {
            category.slug = slug.clone();
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        state.guard("delete_category")?;

        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        state.links.retain(|link| link.category_id != id);
        Ok(state.categories.len() < before)
    }

    async fn ping(&self) -> Result<()> {
        self.state.read().await.guard("ping")
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn find_settings(&self) -> Result<Option<SettingsRow>> {
        let state = self.state.read().await;
        state.guard("find_settings")?;

        Ok(state.settings.clone())
    }

    async fn insert_settings(&self, settings: &Settings) -> Result<SettingsRow> {
        let mut state = self.state.write().await;
        state.guard("insert_settings")?;

        // single row: a second insert overwrites the first in place
        let id = state.settings.as_ref().map_or_else(Uuid::new_v4, |row| row.id);
        let row = settings_row(id, settings);
        state.settings = Some(row.clone());
        Ok(row)
    }

    async fn update_settings(&self, id: Uuid, settings: &Settings) -> Result<SettingsRow> {
        let mut state = self.state.write().await;
        state.guard("update_settings")?;

        if !state.settings.as_ref().is_some_and(|row| row.id == id) {
            return Err(AppError::DatabaseError(sqlx::Error::RowNotFound));
        }

        let row = settings_row(id, settings);
        state.settings = Some(row.clone());
        Ok(row)
    }
}

fn settings_row(id: Uuid, settings: &Settings) -> SettingsRow {
    SettingsRow {
        id,
        store_name: Some(settings.store_name.clone()),
        whatsapp_number: Some(settings.whatsapp_number.clone()),
        phone_number: Some(settings.phone_number.clone()),
        address: Some(settings.address.clone()),
        opening_hours: Some(settings.opening_hours.clone()),
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &NewContactMessage) -> Result<ContactMessage> {
        let mut state = self.state.write().await;
        state.guard("insert_message")?;

        let created = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name.clone(),
            phone: message.phone.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            read: false,
            replied: false,
            created_at: Utc::now(),
        };
        state.messages.push(created.clone());
        Ok(created)
    }

    async fn list_messages(&self, limit: i64, offset: i64) -> Result<Vec<ContactMessage>> {
        let state = self.state.read().await;
        state.guard("list_messages")?;

        let mut messages: Vec<&ContactMessage> = state.messages.iter().collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn set_message_flag(&self, id: Uuid, flag: MessageFlag) -> Result<bool> {
        let mut state = self.state.write().await;
        state.guard("set_message_flag")?;

        let Some(message) = state.messages.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        match flag {
            MessageFlag::Read => message.read = true,
            MessageFlag::Replied => message.replied = true,
        }
        Ok(true)
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        state.guard("delete_message")?;

        let before = state.messages.len();
        state.messages.retain(|m| m.id != id);
        Ok(state.messages.len() < before)
    }
}

#[derive(Debug, Default)]
struct ObjectState {
    objects: BTreeMap<String, (Vec<u8>, UploadOptions)>,
    offline: bool,
}

/// Object store holding uploads in memory, with public URLs shaped like a
/// managed storage service: `{base_url}/storage/v1/object/public/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    base_url: String,
    state: Arc<RwLock<ObjectState>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into(),
            state: Arc::default(),
        }
    }

    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.state.read().await.objects.contains_key(path)
    }

    pub async fn options_for(&self, path: &str) -> Option<UploadOptions> {
        self.state
            .read()
            .await
            .objects
            .get(path)
            .map(|(_, options)| options.clone())
    }

    pub async fn paths(&self) -> Vec<String> {
        self.state.read().await.objects.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>, options: &UploadOptions) -> Result<String> {
        let mut state = self.state.write().await;
        if state.offline {
            return Err(AppError::StorageError("storage unreachable".to_string()));
        }
        if !options.upsert && state.objects.contains_key(path) {
            return Err(AppError::StorageError(format!(
                "The resource already exists: {}",
                path
            )));
        }

        state
            .objects
            .insert(path.to_string(), (bytes, options.clone()));
        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        if state.offline {
            return Err(AppError::StorageError("storage unreachable".to_string()));
        }

        for path in paths {
            state.objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return String::new();
        }

        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            encode_path(path)
        )
    }
}
