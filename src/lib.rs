//! Feedback Insights - Sentiment Classification and Dashboard
//!
//! A Rust library for loading free-text feedback comments from CSV, labelling
//! each one positive, negative or neutral, and summarizing the result.
//!
//! # Features
//!
//! - Load a curated default dataset or a user upload with optional columns
//! - Lexicon and rule based polarity scoring
//! - Trust supplied labels, derive missing ones from the score
//! - Filter by sentiment, domain and keyword
//! - Text dashboard sections and CSV/JSON insight reports

/// Aggregates over filtered views
pub mod analytics;
/// Default dataset memoization
pub mod cache;
/// Label reconciliation
pub mod classifier;
/// Configuration management
pub mod config;
/// Text rendering of dashboard sections
pub mod dashboard;
/// Error types
pub mod error;
/// Filters and views
pub mod filter;
/// CSV loading and schema detection
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Word frequency extraction
pub mod nlp;
/// Insight report export
pub mod report;
/// Polarity scoring
pub mod sentiment;
/// Session service over loader, classifier and cache
pub mod service;
/// Interactive shell
pub mod shell;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use classifier::{label_for_score, SentimentClassifier};
pub use dashboard::{Dashboard, DashboardSettings, Section};
pub use error::{FeedbackError, Result};
pub use filter::{FilterSpec, FilteredView};
pub use models::{CommentRecord, DataSource, Dataset, SentimentLabel};
pub use report::ReportFormat;
pub use sentiment::{LexiconScorer, PolarityScorer};
pub use service::{FeedbackService, SourceSelection};
