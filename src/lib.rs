pub mod api;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::PipelineConfig;
use crate::services::fetcher::Fetcher;
use crate::services::pipeline::Pipeline;
use crate::services::staging::StagingArea;
use crate::services::storage::StorageService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

/// Wires a pipeline from configuration around an already established storage client.
pub fn build_pipeline(
    config: &PipelineConfig,
    storage: Arc<dyn StorageService>,
) -> anyhow::Result<Pipeline> {
    let fetcher = Fetcher::new(config.fetch_timeout)?;
    let staging = StagingArea::new(config.staging_dir.clone(), config.keep_staging_files);
    Ok(Pipeline::new(fetcher, storage, staging))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::handlers::health::health_check))
        .route("/invoke", post(api::handlers::invoke::invoke))
        .with_state(state)
}
