use crate::error::FetchError;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

/// Downloads source images onto local staging storage.
#[derive(Clone)]
pub struct Fetcher {
    http_client: Client,
}

impl Fetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
        })
    }

    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// GETs `url` and streams the body into `dest`, creating or truncating it.
    /// Returns the number of bytes written.
    pub async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let io = |source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let mut response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let mut out = File::create(dest).await.map_err(io)?;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            out.write_all(&chunk).await.map_err(io)?;
            written += chunk.len() as u64;
        }
        out.flush().await.map_err(io)?;

        debug!(url = %url, path = %dest.display(), bytes = written, "Source downloaded");
        Ok(written)
    }
}
