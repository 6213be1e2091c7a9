use crate::config::PipelineConfig;
use crate::services::storage::S3StorageService;
use anyhow::{Result, bail};
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Builds the process-wide S3 client. Called once before the first request.
pub async fn setup_storage(config: &PipelineConfig) -> Result<Arc<S3StorageService>> {
    if config.region.trim().is_empty() {
        bail!("AWS_REGION must not be empty");
    }
    if config.access_key.is_some() != config.secret_key.is_some() {
        bail!("S3_ACCESS_KEY and S3_SECRET_KEY must be set together");
    }

    info!(
        "☁️  S3 Storage: region={}, endpoint={}",
        config.region,
        config.endpoint_url.as_deref().unwrap_or("aws default")
    );

    let mut loader = aws_config::from_env().region(Region::new(config.region.clone()));

    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    if let Some((access_key, secret_key)) = config.static_credentials() {
        loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
            access_key, secret_key, None, None, "static",
        ));
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.force_path_style)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Ok(Arc::new(S3StorageService::new(s3_client)))
}
