use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::Result,
    models::{ContactMessage, NewContactMessage},
};

pub async fn submit_message(
    State(state): State<AppState>,
    Json(payload): Json<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    let created = state.contact.submit(payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
