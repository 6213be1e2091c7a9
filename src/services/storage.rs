use crate::error::UploadError;
use crate::models::StorageTarget;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::debug;

/// Destination for finished images. Implementations hold connection and
/// credential configuration only and are shared by concurrent requests.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams the file at `local_path` to `target`.
    async fn upload_file(
        &self,
        local_path: &Path,
        target: &StorageTarget,
    ) -> Result<(), UploadError>;
}

pub struct S3StorageService {
    client: Client,
}

impl S3StorageService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload_file(
        &self,
        local_path: &Path,
        target: &StorageTarget,
    ) -> Result<(), UploadError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| UploadError::Source {
                path: local_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let res = self
            .client
            .put_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .content_type(content_type_for(local_path))
            .body(body)
            .send()
            .await;

        if let Err(e) = res {
            let message = DisplayErrorContext(&e).to_string();
            debug!(
                "S3 put_object failed: dest={}/{}, error={}",
                target.bucket, target.key, message
            );
            return Err(UploadError::Rejected {
                bucket: target.bucket.clone(),
                key: target.key.clone(),
                message,
            });
        }

        debug!(bucket = %target.bucket, key = %target.key, "Object stored");
        Ok(())
    }
}
