//! Catalog reads served over HTTP, plus category and membership writes.
//!
//! The write half is library API for an admin front end. The public router
//! only exposes reads, since admin authentication lives outside this crate.

use std::{collections::BTreeSet, sync::Arc};

use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        Category, CreateCategoryRequest, Product, ProductFilter, ProductListQuery, ProductPage,
        UpdateCategoryRequest, slugify,
    },
    services::outcome::Outcome,
    store::CatalogStore,
};

/// Read side of the catalog plus the category-membership writes.
///
/// Reads never surface storage errors: they come back as
/// [`Outcome::Degraded`] holding an empty value.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self, query: &ProductListQuery) -> Outcome<ProductPage> {
        let page = query.normalized_page();
        let page_size = query.normalized_page_size();

        match self.fetch_page(query).await {
            Ok(result) => Outcome::Loaded(result),
            Err(err) => {
                Outcome::degraded("list_products", ProductPage::empty(page, page_size), err)
            }
        }
    }

    async fn fetch_page(&self, query: &ProductListQuery) -> Result<ProductPage> {
        let page = query.normalized_page();
        let page_size = query.normalized_page_size();

        // The id set feeds the product filter, so the junction lookup has to
        // finish first.
        let ids = if query.category_ids.is_empty() {
            None
        } else {
            let ids = self
                .store
                .product_ids_in_categories(&query.category_ids)
                .await?;
            if ids.is_empty() {
                return Ok(ProductPage::empty(page, page_size));
            }
            Some(ids)
        };

        let filter = ProductFilter {
            ids,
            search: query.search_text(),
        };

        let (rows, total_count) = self.store.query_products(&filter, query.window()).await?;

        tracing::debug!(
            page,
            page_size,
            total_count,
            returned = rows.len(),
            "product page loaded"
        );

        Ok(ProductPage {
            items: rows.into_iter().map(Product::from).collect(),
            total_count,
            page,
            page_size,
        })
    }

    /// `Loaded(None)` means the product does not exist; a failed lookup is
    /// `Degraded` with `None`.
    pub async fn get_product(&self, id: Uuid) -> Outcome<Option<Product>> {
        let result = self
            .store
            .find_product(id)
            .await
            .map(|row| row.map(Product::from));

        Outcome::from_result("get_product", result, None)
    }

    pub async fn get_categories(&self) -> Outcome<Vec<Category>> {
        Outcome::from_result(
            "get_categories",
            self.store.list_categories().await,
            Vec::new(),
        )
    }

    pub async fn get_product_category_ids(&self, product_id: Uuid) -> Outcome<BTreeSet<Uuid>> {
        let result = self
            .store
            .category_ids_for_product(product_id)
            .await
            .map(|ids| ids.into_iter().collect());

        Outcome::from_result("get_product_category_ids", result, BTreeSet::new())
    }

    /// Full replace of a product's categories: delete every link, then insert
    /// one per id. A failure in either step reports `false`; nothing is rolled
    /// back.
    pub async fn replace_product_categories(
        &self,
        product_id: Uuid,
        category_ids: &BTreeSet<Uuid>,
    ) -> Outcome<bool> {
        if let Err(err) = self.store.delete_product_categories(product_id).await {
            return Outcome::degraded("replace_product_categories", false, err);
        }

        if !category_ids.is_empty() {
            let ids: Vec<Uuid> = category_ids.iter().copied().collect();
            if let Err(err) = self.store.insert_product_categories(product_id, &ids).await {
                return Outcome::degraded("replace_product_categories", false, err);
            }
        }

        tracing::info!(
            %product_id,
            categories = category_ids.len(),
            "product categories replaced"
        );

        Outcome::Loaded(true)
    }

    pub async fn create_category(&self, req: CreateCategoryRequest) -> Outcome<Option<Category>> {
        let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slug.to_string(),
            None => slugify(&req.name),
        };

        let result = self
            .store
            .create_category(req.name.trim(), &slug)
            .await
            .map(Some);

        Outcome::from_result("create_category", result, None)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        req: UpdateCategoryRequest,
    ) -> Outcome<Option<Category>> {
        Outcome::from_result(
            "update_category",
            self.store.update_category(id, &req).await,
            None,
        )
    }

    pub async fn delete_category(&self, id: Uuid) -> Outcome<bool> {
        Outcome::from_result("delete_category", self.store.delete_category(id).await, false)
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
