use crate::AppState;
use crate::api::error::AppError;
use crate::models::Request;
use axum::{Json, extract::State};

/// `POST /invoke` with `{"image": "...", "bucket": "..."}`; answers with the
/// plain-text success token.
pub async fn invoke(
    State(state): State<AppState>,
    Json(req): Json<Request>,
) -> Result<String, AppError> {
    Ok(state.pipeline.handle(&req).await?)
}
