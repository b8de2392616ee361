use axum::{Json, extract::State, response::Response};

use crate::{AppState, routes::with_degraded_flag};

pub async fn get_categories(State(state): State<AppState>) -> Response {
    let outcome = state.catalog.get_categories().await;
    let degraded = outcome.is_degraded();

    with_degraded_flag(degraded, Json(outcome.into_value()))
}
