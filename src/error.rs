//! Error types for the feedback-insights library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, classifying, viewing, or exporting feedback.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// The data source file is absent or unreadable
    #[error("Data source not found: {}", path.display())]
    MissingDataSource {
        /// Path that was requested
        path: PathBuf,
    },

    /// An uploaded file could not be opened
    #[error("Cannot read uploaded file {}: {message}", path.display())]
    UnreadableUpload {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O failure
        message: String,
    },

    /// The source does not have the columns this load requires
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Filters or keyword eliminated every row
    #[error("No data matches the selected filters or keyword")]
    EmptyResultSet,

    /// A single dashboard section failed to render
    #[error("Error creating {section}: {message}")]
    Render {
        /// Section that failed
        section: String,
        /// What went wrong
        message: String,
    },

    /// CSV parsing or writing errors
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// User-supplied input rejected by validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

impl FeedbackError {
    /// Whether the user can recover by changing filters or supplying a new upload.
    ///
    /// Non-recoverable errors halt computation for the current load.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnreadableUpload { .. }
                | Self::InvalidSchema(_)
                | Self::EmptyResultSet
                | Self::Render { .. }
                | Self::Csv(_)
                | Self::InvalidInput(_)
        )
    }

    /// Short category name used for metrics labels
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingDataSource { .. } => "missing_data_source",
            Self::UnreadableUpload { .. } => "unreadable_upload",
            Self::InvalidSchema(_) => "invalid_schema",
            Self::EmptyResultSet => "empty_result_set",
            Self::Render { .. } => "render",
            Self::Csv(_) => "csv",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::InvalidConfig(_) => "invalid_config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Result with FeedbackError
pub type Result<T> = std::result::Result<T, FeedbackError>;

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
