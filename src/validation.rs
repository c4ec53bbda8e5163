use anyhow::{anyhow, Result};
use std::path::Path;

use crate::models::SentimentLabel;

/// Longest keyword accepted by the search box
pub const MAX_KEYWORD_LEN: usize = 200;

/// Validation utilities for user-supplied filters, paths and text
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a search keyword
    ///
    /// Blank keywords are allowed; they disable the keyword filter.
    pub fn validate_keyword(keyword: &str) -> Result<()> {
        if keyword.chars().count() > MAX_KEYWORD_LEN {
            return Err(anyhow!(
                "Keyword too long (max {MAX_KEYWORD_LEN} characters)"
            ));
        }

        if keyword.chars().any(char::is_control) {
            return Err(anyhow!("Keyword contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a CSV file chosen for upload
    pub fn validate_upload_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Upload path cannot be empty"));
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(anyhow!("Uploaded file must be a .csv file: {}", path.display()));
        }

        if !path.exists() {
            return Err(anyhow!("Uploaded file does not exist: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow!("Uploaded path is not a file: {}", path.display()));
        }

        Ok(())
    }

    /// Parse a sentiment filter value
    pub fn validate_sentiment(value: &str) -> Result<SentimentLabel> {
        value.parse::<SentimentLabel>().map_err(|e| anyhow!("{e}"))
    }

    /// Validate a domain filter value
    pub fn validate_domain(value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(anyhow!("Domain cannot be empty"));
        }

        if value.len() > 100 {
            return Err(anyhow!("Domain too long (max 100 characters)"));
        }

        if value.chars().any(char::is_control) {
            return Err(anyhow!("Domain contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a report output path
    pub fn validate_report_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("Report path cannot be empty"));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("Report path too long (max 4096 characters)"));
        }

        if path.is_dir() {
            return Err(anyhow!("Report path is a directory: {}", path.display()));
        }

        if path.file_name().is_none() {
            return Err(anyhow!("Report path must name a file"));
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
