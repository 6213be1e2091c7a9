use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the encoded result inside a request's staging directory
pub const RESULT_FILE_NAME: &str = "resized.png";

/// Staging directory owned by one request. Unless retained, it is removed
/// with its contents when dropped, whichever way the request ended.
pub struct RequestStaging {
    dir: TempDir,
}

impl RequestStaging {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `<request dir>/<basename>`, the raw download.
    pub fn source(&self, basename: &str) -> PathBuf {
        self.dir.path().join(basename)
    }

    /// `<request dir>/resized.png`, the encoded output.
    pub fn result(&self) -> PathBuf {
        self.dir.path().join(RESULT_FILE_NAME)
    }
}

/// Parent directory for per-request staging directories.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    keep: bool,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>, keep: bool) -> Self {
        Self {
            dir: dir.into(),
            keep,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates a fresh `<dir>/transcode-XXXXXX` for one request.
    pub fn begin(&self) -> io::Result<RequestStaging> {
        let dir = tempfile::Builder::new()
            .prefix("transcode-")
            .keep(self.keep)
            .tempdir_in(&self.dir)?;
        Ok(RequestStaging { dir })
    }
}
