use crate::error::{DecodeError, EncodeError, FetchError, PipelineError, Stage};
use crate::models::{Request, StorageTarget};
use crate::services::fetcher::Fetcher;
use crate::services::staging::StagingArea;
use crate::services::storage::StorageService;
use crate::services::transcoder::{self, TARGET_HEIGHT, TARGET_WIDTH};
use crate::utils::validation::parse_image_url;
use image::GenericImageView;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};

/// Runs one request through fetch, decode, resize, encode and upload.
///
/// Stages run strictly in order and the first failure ends the request.
/// Each request stages its files in its own directory; concurrent requests
/// share only the read-only storage and HTTP clients.
pub struct Pipeline {
    fetcher: Fetcher,
    storage: Arc<dyn StorageService>,
    staging: StagingArea,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, storage: Arc<dyn StorageService>, staging: StagingArea) -> Self {
        Self {
            fetcher,
            storage,
            staging,
        }
    }

    /// Returns `"Done: <basename>"` once the resized image is stored under
    /// `(req.bucket_name, basename)`.
    pub async fn handle(&self, req: &Request) -> Result<String, PipelineError> {
        info!(image = %req.image_url, bucket = %req.bucket_name, "Got a request");

        let (url, basename) = parse_image_url(&req.image_url).map_err(|e| {
            error!(stage = %Stage::Fetch, "Rejected image URL: {}", e);
            PipelineError::from(e)
        })?;

        let span = info_span!("transcode", basename = %basename);
        let target = StorageTarget {
            bucket: req.bucket_name.clone(),
            key: basename.clone(),
        };

        let result = async {
            // Dropped at the end of this block so the files are gone before
            // the caller sees the outcome.
            let staging = self.staging.begin().map_err(|source| FetchError::Io {
                path: self.staging.dir().to_path_buf(),
                source,
            })?;
            let source_path = staging.source(&basename);
            let resized_path = staging.result();

            let bytes = self.fetcher.fetch(&url, &source_path).await?;
            info!(bytes, "Fetched source image");

            let decoded = tokio::task::spawn_blocking(move || transcoder::decode(&source_path))
                .await
                .map_err(DecodeError::from)??;
            let (width, height) = decoded.dimensions();
            info!(width, height, "Decoded source image");

            let raster = transcoder::resize(&decoded);
            drop(decoded);
            info!(
                stage = %Stage::Resize,
                width = TARGET_WIDTH,
                height = TARGET_HEIGHT,
                "Resized"
            );

            let encode_path = resized_path.clone();
            tokio::task::spawn_blocking(move || transcoder::encode(&raster, &encode_path))
                .await
                .map_err(EncodeError::from)??;

            self.storage.upload_file(&resized_path, &target).await?;
            info!(bucket = %target.bucket, key = %target.key, "Uploaded resized image");

            Ok::<_, PipelineError>(())
        }
        .instrument(span.clone())
        .await;

        match result {
            Ok(()) => Ok(format!("Done: {}", basename)),
            Err(e) => {
                span.in_scope(|| error!(stage = %e.stage(), "Pipeline failed: {}", e));
                Err(e)
            }
        }
    }
}
