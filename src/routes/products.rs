use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ContactLinkResponse, DEFAULT_PAGE_SIZE, Product, ProductDetailResponse, ProductListParams,
        ProductListQuery, ProductListResponse, ProductResponse,
    },
    routes::with_degraded_flag,
    services::{ImageResolver, link_service},
};

fn parse_category_ids(raw: Option<&str>) -> Result<Vec<Uuid>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Uuid>()
                .map_err(|_| AppError::BadRequest(format!("Invalid category id: {}", s)))
        })
        .collect()
}

fn to_response(images: &ImageResolver, product: Product) -> ProductResponse {
    let gallery = images.display_images(&product);
    ProductResponse {
        primary_image: gallery.first().cloned(),
        images: gallery,
        product,
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Response> {
    let query = ProductListQuery {
        category_ids: parse_category_ids(params.categories.as_deref())?,
        search: params.search,
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };

    let outcome = state.catalog.list_products(&query).await;
    let degraded = outcome.is_degraded();
    let page = outcome.into_value();

    let body = ProductListResponse {
        total: page.total_count,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages(),
        products: page
            .items
            .into_iter()
            .map(|product| to_response(&state.images, product))
            .collect(),
    };

    Ok(with_degraded_flag(degraded, Json(body)))
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let (product, category_ids) = tokio::join!(
        state.catalog.get_product(id),
        state.catalog.get_product_category_ids(id)
    );
    let degraded = product.is_degraded() || category_ids.is_degraded();

    match product.into_value() {
        Some(product) => with_degraded_flag(
            degraded,
            Json(ProductDetailResponse {
                product: to_response(&state.images, product),
                category_ids: category_ids.into_value().into_iter().collect(),
            }),
        ),
        None => with_degraded_flag(
            degraded,
            AppError::NotFound("Product not found".to_string()),
        ),
    }
}

pub async fn get_contact_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let (product, settings) = tokio::join!(
        state.catalog.get_product(id),
        state.settings.get_settings()
    );

    let product = product
        .into_value()
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let settings = settings.into_value();
    if !settings.has_whatsapp() {
        return Err(AppError::BadRequest(
            "WhatsApp number is not configured".to_string(),
        ));
    }

    let url = link_service::whatsapp_link(
        &settings.whatsapp_number,
        &product.name,
        product.code.as_deref(),
        product.color.as_deref(),
        &link_service::product_page_url(&state.storefront_url, product.id),
    )?;

    Ok(Json(ContactLinkResponse { url }).into_response())
}
