use crate::error::{FetchError, PipelineError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Pipeline(e) = self;

        let status = match &e {
            PipelineError::Fetch(FetchError::InvalidUrl { .. }) => StatusCode::BAD_REQUEST,
            PipelineError::Fetch(_) | PipelineError::Upload(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": e.to_string(),
            "stage": e.stage().as_str(),
        }));

        (status, body).into_response()
    }
}
