use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Storage region (default: "eu-central-1")
    pub region: String,

    /// Custom S3-compatible endpoint, e.g. MinIO (default: none, AWS)
    pub endpoint_url: Option<String>,

    /// Static access key; when absent the default AWS credential chain is used
    pub access_key: Option<String>,

    /// Static secret key, paired with `access_key`
    pub secret_key: Option<String>,

    /// Path-style bucket addressing, needed by most S3-compatible servers (default: false)
    pub force_path_style: bool,

    /// Directory holding the per-request staging files (default: "/tmp")
    pub staging_dir: PathBuf,

    /// Leave staging files on disk after the request finishes (default: false)
    pub keep_staging_files: bool,

    /// Whole-request timeout for the source download (default: none, client default)
    pub fetch_timeout: Option<Duration>,

    /// Port for `serve` mode (default: 3000)
    pub port: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: "eu-central-1".to_string(),
            endpoint_url: None,
            access_key: None,
            secret_key: None,
            force_path_style: false,
            staging_dir: PathBuf::from("/tmp"),
            keep_staging_files: false,
            fetch_timeout: None,
            port: 3000,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            region: env::var("AWS_REGION").unwrap_or(default.region),

            endpoint_url: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            access_key: env::var("S3_ACCESS_KEY").ok().filter(|v| !v.is_empty()),
            secret_key: env::var("S3_SECRET_KEY").ok().filter(|v| !v.is_empty()),

            force_path_style: env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.force_path_style),

            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            keep_staging_files: env::var("KEEP_STAGING_FILES")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.keep_staging_files),

            fetch_timeout: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    /// Local MinIO setup: path-style addressing, staging files kept for inspection
    pub fn development() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://127.0.0.1:9000".to_string()),
            access_key: Some("minioadmin".to_string()),
            secret_key: Some("minioadmin".to_string()),
            force_path_style: true,
            staging_dir: env::temp_dir(),
            keep_staging_files: true,
            fetch_timeout: Some(Duration::from_secs(30)),
            port: 3000,
        }
    }

    /// Static credentials, if both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }
}
