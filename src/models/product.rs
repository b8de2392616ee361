use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `products` row as the store hands it back. Older rows may carry only
/// the single `image_url` column and a null `image_urls` array.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub code: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: u32,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub code: Option<String>,
    pub image_urls: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Image references in display order, falling back to the legacy single
    /// image when the list is empty.
    pub fn image_refs(&self) -> Vec<&str> {
        if !self.image_urls.is_empty() {
            return self.image_urls.iter().map(String::as_str).collect();
        }

        self.image_url.as_deref().into_iter().collect()
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity.unwrap_or(0).max(0) as u32,
            brand: non_blank(row.brand),
            color: non_blank(row.color),
            size: non_blank(row.size),
            code: non_blank(row.code),
            image_urls: row
                .image_urls
                .unwrap_or_default()
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect(),
            image_url: non_blank(row.image_url),
            created_at: row.created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Row filter handed to the store: id membership and free-text search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub ids: Option<Vec<Uuid>>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub category_ids: Vec<Uuid>,
    pub search: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl ProductListQuery {
    pub fn page(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    pub fn normalized_page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn normalized_page_size(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn window(&self) -> Window {
        let limit = self.normalized_page_size();
        Window {
            offset: (self.normalized_page() - 1).saturating_mul(limit),
            limit,
        }
    }

    pub fn search_text(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

impl ProductPage {
    pub fn empty(page: i64, page_size: i64) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total_count + self.page_size - 1) / self.page_size
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Comma separated category ids.
    pub categories: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<String>,
    pub primary_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ContactLinkResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: "Matte White".to_string(),
            description: None,
            price: None,
            stock_quantity: Some(-3),
            brand: Some("  ".to_string()),
            color: Some("White".to_string()),
            size: None,
            code: None,
            image_urls: None,
            image_url: Some("legacy/1.png".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_conversion_defaults_malformed_fields() {
        let product = Product::from(row());

        assert_eq!(product.stock_quantity, 0);
        assert_eq!(product.brand, None);
        assert!(product.image_urls.is_empty());
        assert_eq!(product.image_refs(), vec!["legacy/1.png"]);
    }

    #[test]
    fn image_list_takes_precedence_over_legacy_field() {
        let mut r = row();
        r.image_urls = Some(vec!["a.png".to_string(), "b.png".to_string()]);
        let product = Product::from(r);

        assert_eq!(product.image_refs(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn window_uses_zero_based_offset() {
        let query = ProductListQuery::page(3, 12);
        assert_eq!(query.window(), Window { offset: 24, limit: 12 });

        let clamped = ProductListQuery::page(0, 1000);
        assert_eq!(clamped.window(), Window { offset: 0, limit: MAX_PAGE_SIZE });
    }

    #[test]
    fn total_pages_rounds_up() {
        let mut page = ProductPage::empty(1, 12);
        page.total_count = 25;
        assert_eq!(page.total_pages(), 3);
    }
}
