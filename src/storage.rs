//! Upload directory handling
//!
//! Uploaded bytes are written under a generated name derived from the upload
//! time and a content hash. Removal is best-effort: it runs as a tracked
//! background task and its failure is only logged.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::error::Result;

/// Hex characters of the content hash kept in a stored name
const HASH_PREFIX_LEN: usize = 16;

/// Longest extension carried over from the original file name
const MAX_EXTENSION_LEN: usize = 16;

/// Handle on the directory holding uploaded objects
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Use `dir` for uploads, creating it if missing
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an upload and return its stored name
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let name = stored_name(original_name, bytes, chrono::Utc::now().timestamp_millis());
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        debug!("Stored upload {} as {}", original_name, name);
        Ok(name)
    }

    /// Resolve a stored name inside the upload directory.
    ///
    /// Names with directory components are rejected.
    pub fn path_for(&self, stored: &str) -> Option<PathBuf> {
        let file_name = Path::new(stored).file_name()?;
        if file_name != stored {
            return None;
        }
        Some(self.dir.join(file_name))
    }

    /// Remove a stored object in the background; failures are logged only
    pub fn remove_detached(&self, tracker: &TaskTracker, stored: String) {
        let Some(path) = self.path_for(&stored) else {
            warn!("Refusing to remove suspicious stored path {:?}", stored);
            return;
        };
        tracker.spawn(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Removed stored upload {}", path.display()),
                Err(err) => warn!("Failed to remove stored upload {}: {}", path.display(), err),
            }
        });
    }
}

/// Generated name: `<millis>-<hash prefix>[.<ext>]`
pub fn stored_name(original_name: &str, bytes: &[u8], millis: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = hex::encode(hasher.finalize());
    let prefix = &hash[..HASH_PREFIX_LEN];

    match sanitized_extension(original_name) {
        Some(ext) => format!("{}-{}.{}", millis, prefix, ext),
        None => format!("{}-{}", millis, prefix),
    }
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
