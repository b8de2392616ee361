use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Category, UpdateCategoryRequest},
};

/// Find category by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Get all categories, alphabetical
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

/// Product ids linked to any of the given categories
pub async fn get_product_ids_in_categories(
    pool: &PgPool,
    category_ids: &[Uuid],
) -> Result<Vec<Uuid>> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT DISTINCT product_id FROM product_categories WHERE category_id = ANY($1)",
    )
    .bind(category_ids)
    .fetch_all(pool)
    .await?;

    Ok(product_ids)
}

/// Category ids assigned to a product
pub async fn get_product_category_ids(pool: &PgPool, product_id: Uuid) -> Result<Vec<Uuid>> {
    let category_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT category_id FROM product_categories WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(category_ids)
}

/// Create a new category
pub async fn create_category(pool: &PgPool, name: &str, slug: &str) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, slug)
         VALUES ($1, $2)
         RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Update an existing category
pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateCategoryRequest,
) -> Result<Option<Category>> {
    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE categories SET ");
    let mut has_fields = false;

    if let Some(ref name) = req.name {
        query_builder.push("name = ");
        query_builder.push_bind(name.clone());
        has_fields = true;
    }

    if let Some(ref slug) = req.slug {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("slug = ");
        query_builder.push_bind(slug.clone());
        has_fields = true;
    }

    if !has_fields {
        // No fields to update, return existing category
        return find_by_id(pool, id).await;
    }

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    let category = query_builder
        .build_query_as::<Category>()
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Delete a category
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every category association of a product
pub async fn clear_product_categories(pool: &PgPool, product_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Link a product to categories
pub async fn insert_product_categories(
    pool: &PgPool,
    product_id: Uuid,
    category_ids: &[Uuid],
) -> Result<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let mut query_builder =
        sqlx::QueryBuilder::new("INSERT INTO product_categories (product_id, category_id) ");

    query_builder.push_values(category_ids, |mut b, category_id| {
        b.push_bind(product_id).push_bind(*category_id);
    });

    query_builder.push(" ON CONFLICT DO NOTHING");

    query_builder.build().execute(pool).await?;

    Ok(())
}
