use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{ProductFilter, ProductRow, Window},
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock_quantity, brand, color, size, \
     code, image_urls, image_url, created_at";

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProductRow>> {
    let product = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Escapes LIKE wildcards so user text only ever matches literally.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    // id membership
    if let Some(ref ids) = filter.ids {
        query.push(" AND id = ANY(");
        query.push_bind(ids.clone());
        query.push(")");
    }

    // text search
    if let Some(ref q) = filter.search {
        let pattern = format!("%{}%", escape_like(q));
        query.push(" AND (name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR code ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR brand ILIKE ");
        query.push_bind(pattern);
        query.push(" ESCAPE '\\')");
    }
}

pub async fn count_products(pool: &PgPool, filter: &ProductFilter) -> Result<i64> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
    push_filter(&mut query, filter);

    let total = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(total)
}

pub async fn search_products(
    pool: &PgPool,
    filter: &ProductFilter,
    window: Window,
) -> Result<Vec<ProductRow>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM products WHERE 1=1", PRODUCT_COLUMNS));
    push_filter(&mut query, filter);

    // sort, id keeps equal timestamps stable across windows
    query.push(" ORDER BY created_at DESC, id");

    // pagination
    query.push(" LIMIT ");
    query.push_bind(window.limit);
    query.push(" OFFSET ");
    query.push_bind(window.offset);

    let products = query.build_query_as::<ProductRow>().fetch_all(pool).await?;

    Ok(products)
}
