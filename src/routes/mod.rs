mod categories;
mod contact;
mod health;
mod products;
mod settings;

use axum::{
    Router,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::AppState;

/// Set on responses that carry a fallback value because the store failed.
pub const DEGRADED_HEADER: &str = "x-catalog-degraded";

pub(crate) fn with_degraded_flag(degraded: bool, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if degraded {
        response
            .headers_mut()
            .insert(DEGRADED_HEADER, HeaderValue::from_static("true"));
    }
    response
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/products/{id}/contact-link", get(products::get_contact_link))
        .route("/categories", get(categories::get_categories))
        .route("/settings", get(settings::get_settings))
        .route("/contact-messages", post(contact::submit_message))
}
