//! Insight report export.
//!
//! This module writes the current filtered view as a downloadable report: a
//! four-row summary block followed by the classified rows. CSV output uses the
//! union of both blocks' columns, leaving cells blank where a block has no value.

use crate::analytics::Summary;
use crate::error::{FeedbackError, Result};
use crate::filter::FilteredView;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{CommentRecord, Schema};
use csv::Writer;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Comma-separated values format
    #[default]
    Csv,
    /// JSON format
    Json,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(FeedbackError::InvalidInput(format!(
                "Invalid report format: {other}. Must be one of: csv, json"
            ))),
        }
    }
}

/// Write a report of `view` to `writer`.
///
/// `schema` decides whether a `comment_id` column is emitted.
///
/// # Returns
///
/// Number of comment rows written
///
/// # Errors
///
/// `EmptyResultSet` when the view has no rows; there is nothing to download.
pub fn write_report<W: Write>(
    writer: W,
    view: &FilteredView<'_>,
    schema: &Schema,
    format: ReportFormat,
) -> Result<usize> {
    let summary = Summary::from_view(view)?;
    match format {
        ReportFormat::Csv => write_csv_report(writer, &summary, view, schema.has_comment_id)?,
        ReportFormat::Json => write_json_report(writer, &summary, view)?,
    }
    MetricsCollector::default().record_export(format.extension(), view.len());
    Ok(view.len())
}

/// Write a report to `file_path`, creating parent directories as needed.
pub fn write_report_to_file(
    view: &FilteredView<'_>,
    schema: &Schema,
    format: ReportFormat,
    file_path: &Path,
) -> Result<usize> {
    let timer = OperationTimer::new("export");
    if view.is_empty() {
        return Err(FeedbackError::EmptyResultSet);
    }
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let file = File::create(file_path)?;
    let rows = write_report(BufWriter::new(file), view, schema, format)?;
    info!("Wrote {} comments to {}", rows, file_path.display());
    timer.finish();
    Ok(rows)
}

/// Write the CSV report.
///
/// Header: `Metric, Value, [comment_id,] comment, domain, sentiment_label, polarity_score`
fn write_csv_report<W: Write>(
    writer: W,
    summary: &Summary,
    view: &FilteredView<'_>,
    include_comment_id: bool,
) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    let mut header = vec!["Metric", "Value"];
    if include_comment_id {
        header.push("comment_id");
    }
    header.extend(["comment", "domain", "sentiment_label", "polarity_score"]);
    writer.write_record(&header)?;

    let record_columns = header.len() - 2;
    for (metric, value) in summary.metric_rows() {
        let mut row = vec![metric.to_string(), value];
        row.resize(2 + record_columns, String::new());
        writer.write_record(&row)?;
    }

    for record in view.iter() {
        writer.write_record(&record_row(record, include_comment_id))?;
    }

    writer.flush()?;
    Ok(())
}

fn record_row(record: &CommentRecord, include_comment_id: bool) -> Vec<String> {
    let mut row = vec![String::new(), String::new()];
    if include_comment_id {
        row.push(record.comment_id.clone().unwrap_or_default());
    }
    row.extend([
        record.comment.clone(),
        record.domain.clone(),
        record.sentiment_label.to_string(),
        format!("{:.4}", record.polarity_score),
    ]);
    row
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    comments: Vec<&'a CommentRecord>,
}

/// Write the JSON report: `{ "summary": ..., "comments": [...] }`
fn write_json_report<W: Write>(mut writer: W, summary: &Summary, view: &FilteredView<'_>) -> Result<()> {
    let report = JsonReport {
        summary,
        comments: view.iter().collect(),
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
