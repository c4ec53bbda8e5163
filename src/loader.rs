//! Dataset loading and normalization
//!
//! Two policies share one CSV reader: the curated default source drops any row
//! with a gap, uploads only require a comment and default what is missing.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FeedbackError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{
    normalize_category, DataSource, PendingRecord, Schema, SentimentLabel, DEFAULT_DOMAIN,
};

const COMMENT: &str = "comment";
const COMMENT_ID: &str = "comment_id";
const SENTIMENT_LABEL: &str = "sentiment_label";
const DOMAIN: &str = "domain";

/// Loaded rows awaiting classification
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Optional columns present in the source
    pub schema: Schema,
    /// Rows that survived the drop policy, in source order
    pub records: Vec<PendingRecord>,
    /// Rows discarded by the drop policy
    pub dropped_rows: usize,
}

/// Which drop/default policy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Curated source: every column required, any gap drops the row
    Curated,
    /// User upload: only `comment` required
    Upload,
}

impl Policy {
    const fn name(self) -> &'static str {
        match self {
            Self::Curated => "default",
            Self::Upload => "upload",
        }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndex {
    comment: Option<usize>,
    comment_id: Option<usize>,
    sentiment_label: Option<usize>,
    domain: Option<usize>,
    width: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut index = Self {
            width: headers.len(),
            ..Self::default()
        };
        for (position, header) in headers.iter().enumerate() {
            match header.trim_start_matches('\u{feff}').trim() {
                COMMENT => index.comment = index.comment.or(Some(position)),
                COMMENT_ID => index.comment_id = index.comment_id.or(Some(position)),
                SENTIMENT_LABEL => index.sentiment_label = index.sentiment_label.or(Some(position)),
                DOMAIN => index.domain = index.domain.or(Some(position)),
                _ => {}
            }
        }
        index
    }

    const fn schema(&self) -> Schema {
        Schema {
            has_comment_id: self.comment_id.is_some(),
            has_sentiment_label: self.sentiment_label.is_some(),
            has_domain: self.domain.is_some(),
        }
    }
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .filter(|value| !value.trim().is_empty())
}

/// Reads CSV sources into pending records
#[derive(Debug, Default)]
pub struct DatasetLoader {
    metrics: MetricsCollector,
}

impl DatasetLoader {
    /// Create a loader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load whichever source is given, with that source's policy
    pub fn load(&self, source: &DataSource) -> Result<LoadedTable> {
        match source {
            DataSource::Default(path) => self.load_default(path),
            DataSource::Upload(path) => self.load_upload(path),
        }
    }

    /// Load the curated default dataset from disk
    pub fn load_default(&self, path: &Path) -> Result<LoadedTable> {
        let file = open_source(path, Policy::Curated)?;
        info!("Loading default dataset from {}", path.display());
        self.read(file, Policy::Curated)
    }

    /// Load a user-supplied CSV from disk
    pub fn load_upload(&self, path: &Path) -> Result<LoadedTable> {
        let file = open_source(path, Policy::Upload)?;
        info!("Loading uploaded dataset from {}", path.display());
        self.read(file, Policy::Upload)
    }

    /// Read curated CSV data from any reader
    pub fn read_default<R: Read>(&self, reader: R) -> Result<LoadedTable> {
        self.read(reader, Policy::Curated)
    }

    /// Read uploaded CSV data from any reader
    pub fn read_upload<R: Read>(&self, reader: R) -> Result<LoadedTable> {
        self.read(reader, Policy::Upload)
    }

    fn read<R: Read>(&self, reader: R, policy: Policy) -> Result<LoadedTable> {
        let timer = OperationTimer::new("load");
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers);
        check_schema(&columns, policy)?;
        let schema = columns.schema();
        debug!(?schema, policy = policy.name(), "Resolved dataset schema");

        let mut records = Vec::new();
        let mut dropped_rows = 0;

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() > columns.width {
                return Err(FeedbackError::InvalidSchema(format!(
                    "Row on line {} has {} fields but the header has {}.",
                    row + 2,
                    record.len(),
                    columns.width
                )));
            }
            match parse_row(&record, &columns, policy) {
                Some(pending) => records.push(pending),
                None => {
                    // header is line 1
                    debug!(line = row + 2, "Dropping incomplete row");
                    dropped_rows += 1;
                }
            }
        }

        if dropped_rows > 0 {
            warn!(
                dropped_rows,
                source = policy.name(),
                "Dropped rows with missing or invalid fields"
            );
        }
        self.metrics
            .record_load(policy.name(), records.len(), dropped_rows);
        timer.finish();

        Ok(LoadedTable {
            schema,
            records,
            dropped_rows,
        })
    }
}

/// Open a source file; only the default source is fatal when unreadable
fn open_source(path: &Path, policy: Policy) -> Result<File> {
    File::open(path).map_err(|e| {
        warn!("Cannot open data source {}: {}", path.display(), e);
        match policy {
            Policy::Curated => FeedbackError::MissingDataSource {
                path: path.to_path_buf(),
            },
            Policy::Upload => FeedbackError::UnreadableUpload {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        }
    })
}

fn check_schema(columns: &ColumnIndex, policy: Policy) -> Result<()> {
    if columns.comment.is_none() {
        let message = match policy {
            Policy::Upload => "Uploaded CSV must contain a 'comment' column.",
            Policy::Curated => "Default dataset must contain a 'comment' column.",
        };
        return Err(FeedbackError::InvalidSchema(message.to_string()));
    }
    if policy == Policy::Curated {
        let mut missing = Vec::new();
        if columns.sentiment_label.is_none() {
            missing.push(SENTIMENT_LABEL);
        }
        if columns.domain.is_none() {
            missing.push(DOMAIN);
        }
        if !missing.is_empty() {
            return Err(FeedbackError::InvalidSchema(format!(
                "Default dataset is missing required column(s): {}",
                missing.join(", ")
            )));
        }
    }
    Ok(())
}

/// Apply the row policy; `None` means the row is dropped
fn parse_row(record: &StringRecord, columns: &ColumnIndex, policy: Policy) -> Option<PendingRecord> {
    if policy == Policy::Curated
        && (record.len() < columns.width || record.iter().any(|field| field.trim().is_empty()))
    {
        return None;
    }

    let comment = cell(record, columns.comment)?.to_string();
    let comment_id = cell(record, columns.comment_id).map(ToString::to_string);

    let sentiment_label = match cell(record, columns.sentiment_label) {
        Some(raw) => match raw.parse::<SentimentLabel>() {
            Ok(label) => Some(label),
            Err(_) => {
                warn!(label = raw, "Dropping row with unrecognized sentiment label");
                return None;
            }
        },
        None => None,
    };

    let domain = cell(record, columns.domain)
        .map_or_else(|| DEFAULT_DOMAIN.to_string(), normalize_category);

    Some(PendingRecord {
        comment_id,
        comment,
        sentiment_label,
        domain,
    })
}
