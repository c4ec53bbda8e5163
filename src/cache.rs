use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::models::Dataset;

/// Process-wide memo of classified default datasets
///
/// Keyed on the source path. Entries are never invalidated: the bundled source is
/// static for the life of the process and reclassifying it gives identical results.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(path: &Path) -> PathBuf {
        // Same file reached through different relative paths shares one entry
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Cached dataset for `path`, if any
    pub fn get_cached_dataset(&self, path: &Path) -> Option<Arc<Dataset>> {
        let key = Self::make_key(path);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Return the cached dataset or build, store and return it
    ///
    /// Failures are not cached, so a later call retries the build.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if let Some(dataset) = self.get_cached_dataset(path) {
            tracing::debug!("Using cached dataset for {}", path.display());
            return Ok(dataset);
        }

        let dataset = Arc::new(load()?);
        let key = Self::make_key(path);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(dataset)))
    }

    /// Number of cached datasets
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear_cache(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
