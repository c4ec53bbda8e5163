use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::DatasetCache;
use crate::classifier::SentimentClassifier;
use crate::error::Result;
use crate::loader::{DatasetLoader, LoadedTable};
use crate::metrics::MetricsCollector;
use crate::models::{DataSource, Dataset};
use crate::sentiment::{LexiconScorer, PolarityScorer};

/// Which data source the user has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceSelection {
    /// The bundled dataset
    #[default]
    Default,
    /// The most recent successful upload
    Upload,
}

/// Load, classify and hold the datasets of one dashboard session
pub struct FeedbackService<S = LexiconScorer> {
    loader: DatasetLoader,
    classifier: SentimentClassifier<S>,
    cache: Arc<DatasetCache>,
    default_path: PathBuf,
    upload: Option<Arc<Dataset>>,
    metrics: MetricsCollector,
}

impl FeedbackService<LexiconScorer> {
    /// Service over the bundled lexicon scorer with a private cache
    pub fn new(default_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_scorer(default_path, LexiconScorer::new()?))
    }
}

impl<S: PolarityScorer> FeedbackService<S> {
    /// Service over a caller-provided scorer
    pub fn with_scorer(default_path: impl Into<PathBuf>, scorer: S) -> Self {
        Self::with_cache(default_path, scorer, Arc::new(DatasetCache::new()))
    }

    /// Service sharing an existing default-dataset cache
    pub fn with_cache(default_path: impl Into<PathBuf>, scorer: S, cache: Arc<DatasetCache>) -> Self {
        Self {
            loader: DatasetLoader::new(),
            classifier: SentimentClassifier::new(scorer),
            cache,
            default_path: default_path.into(),
            upload: None,
            metrics: MetricsCollector::default(),
        }
    }

    /// Path of the bundled dataset
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Load and classify `source` without touching the cache
    pub fn load_dataset(&self, source: &DataSource) -> Result<Dataset> {
        let loaded = self.loader.load(source).inspect_err(|e| {
            self.metrics.record_error(e.kind(), "load");
        })?;
        Ok(self.classify_loaded(source.clone(), loaded))
    }

    fn classify_loaded(&self, source: DataSource, loaded: LoadedTable) -> Dataset {
        let records = self.classifier.classify(loaded.records);
        info!(
            source = source.display_name(),
            records = records.len(),
            dropped = loaded.dropped_rows,
            "Dataset ready"
        );
        Dataset::new(source, loaded.schema, loaded.dropped_rows, records)
    }

    /// The classified default dataset, computed at most once per cache
    pub fn default_dataset(&self) -> Result<Arc<Dataset>> {
        let source = DataSource::Default(self.default_path.clone());
        self.cache
            .get_or_load(&self.default_path, || self.load_dataset(&source))
    }

    /// Load and classify an uploaded file, making it the active upload
    ///
    /// On failure the previous upload is discarded, leaving no active upload;
    /// the error is returned for the caller to show.
    pub fn upload(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        self.upload = None;
        let source = DataSource::Upload(path.to_path_buf());
        let dataset = Arc::new(self.load_dataset(&source)?);
        info!("File uploaded successfully! Sentiment analysis applied.");
        self.upload = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Same as [`Self::upload`] but reading from memory; `name` labels the source
    pub fn upload_reader<R: Read>(&mut self, name: &Path, reader: R) -> Result<Arc<Dataset>> {
        self.upload = None;
        let loaded = self.loader.read_upload(reader).inspect_err(|e| {
            self.metrics.record_error(e.kind(), "upload");
        })?;
        let dataset = Arc::new(self.classify_loaded(DataSource::Upload(name.to_path_buf()), loaded));
        self.upload = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Forget the active upload
    pub fn clear_upload(&mut self) {
        self.upload = None;
    }

    /// The active upload, if one loaded successfully
    pub const fn uploaded(&self) -> Option<&Arc<Dataset>> {
        self.upload.as_ref()
    }

    /// Dataset backing the current views
    ///
    /// Selecting the upload with none active falls back to the default dataset.
    pub fn active_dataset(&self, selection: SourceSelection) -> Result<Arc<Dataset>> {
        match (selection, &self.upload) {
            (SourceSelection::Upload, Some(dataset)) => Ok(Arc::clone(dataset)),
            (SourceSelection::Upload, None) => {
                warn!("No valid upload is active; showing the default dataset");
                self.default_dataset()
            }
            (SourceSelection::Default, _) => self.default_dataset(),
        }
    }
}
