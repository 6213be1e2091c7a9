use serde::{Deserialize, Serialize};

/// Invocation event: `{ "image": "<source URL>", "bucket": "<destination bucket>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "bucket")]
    pub bucket_name: String,
}

impl Request {
    pub fn new(image_url: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            bucket_name: bucket_name.into(),
        }
    }
}

/// Destination object; `key` is the basename of the source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub bucket: String,
    pub key: String,
}
