use crate::error::Result;
use crate::models::Review;
use crate::storage::{OutputFormat, write_reviews};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable snapshot of everything accumulated so far, rewritten after each
/// page so an interruption loses at most the in-flight page. Keyed by the
/// place's feature id so a re-run of the same place lands on the same file.
pub struct TempStore {
    path: PathBuf,
    format: OutputFormat,
}

impl TempStore {
    pub fn new(root: impl AsRef<Path>, feature_id: &str, format: OutputFormat) -> Self {
        let path = root.as_ref().join(format!(
            "gmaps_reviews_temp_{feature_id}.{}",
            format.extension()
        ));
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the snapshot. Idempotent: the same input produces an
    /// equivalent file.
    pub fn persist(&self, reviews: &[Review]) -> Result<()> {
        write_reviews(&self.path, self.format, reviews)?;
        debug!(path = %self.path.display(), count = reviews.len(), "Snapshot written");
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
