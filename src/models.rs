//! Data models for feedback classification
//!
//! This module contains the records of the working table, the optional-column
//! schema detected at load time, and the classified dataset itself.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::FeedbackError;

/// Domain assigned to uploaded rows when the source has no `domain` column
pub const DEFAULT_DOMAIN: &str = "general";

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Favorable feedback
    Positive,
    /// Unfavorable feedback
    Negative,
    /// Neither favorable nor unfavorable
    Neutral,
}

impl SentimentLabel {
    /// All labels in display order
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Lowercase name as it appears in data files
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Capitalized name for headings
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = FeedbackError;

    /// Parses after trimming and lowercasing, so `" Positive "` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(FeedbackError::InvalidInput(format!(
                "Unknown sentiment label: '{other}'. Must be one of: positive, negative, neutral"
            ))),
        }
    }
}

/// Lowercase and trim a categorical field
#[must_use]
pub fn normalize_category(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Where a dataset was loaded from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// The bundled, curated dataset
    Default(PathBuf),
    /// A user-supplied CSV file
    Upload(PathBuf),
}

impl DataSource {
    /// Path of the underlying file
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Default(path) | Self::Upload(path) => path,
        }
    }

    /// Name shown in the summary panel
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Default(_) => "Default Dataset",
            Self::Upload(_) => "Uploaded Dataset",
        }
    }
}

/// Which optional columns the source carried
///
/// `comment` is mandatory and therefore not represented here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Source had a `comment_id` column
    pub has_comment_id: bool,
    /// Source had a `sentiment_label` column
    pub has_sentiment_label: bool,
    /// Source had a `domain` column
    pub has_domain: bool,
}

/// A loaded but not yet classified row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    /// Opaque identifier from the source, if any
    pub comment_id: Option<String>,
    /// Non-empty comment text
    pub comment: String,
    /// Label supplied by the source; `None` means derive it from the score
    pub sentiment_label: Option<SentimentLabel>,
    /// Normalized domain
    pub domain: String,
}

/// One row of the working table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    /// Opaque identifier from the source, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    /// Non-empty comment text
    pub comment: String,
    /// Normalized domain
    pub domain: String,
    /// Supplied or derived label
    pub sentiment_label: SentimentLabel,
    /// Compound polarity score in [-1.0, 1.0]
    pub polarity_score: f64,
}

/// A fully classified dataset, immutable once built
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the rows came from
    pub source: DataSource,
    /// Optional columns present in the source
    pub schema: Schema,
    /// Rows discarded during loading
    pub dropped_rows: usize,
    /// When this load event happened
    pub loaded_at: DateTime<Local>,
    records: Vec<CommentRecord>,
}

impl Dataset {
    /// Build a dataset from already classified records
    #[must_use]
    pub fn new(
        source: DataSource,
        schema: Schema,
        dropped_rows: usize,
        records: Vec<CommentRecord>,
    ) -> Self {
        Self {
            source,
            schema,
            dropped_rows,
            loaded_at: Local::now(),
            records,
        }
    }

    /// Classified rows in source order
    #[must_use]
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Number of classified rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no rows survived loading
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_normalizes() {
        assert_eq!(
            " Positive ".parse::<SentimentLabel>().ok(),
            Some(SentimentLabel::Positive)
        );
        assert_eq!(
            "NEGATIVE".parse::<SentimentLabel>().ok(),
            Some(SentimentLabel::Negative)
        );
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Mental_Health "), "mental_health");
    }

    #[test]
    fn test_source_display_name() {
        let source = DataSource::Upload(PathBuf::from("upload.csv"));
        assert_eq!(source.display_name(), "Uploaded Dataset");
        assert_eq!(source.path(), Path::new("upload.csv"));
    }
}
