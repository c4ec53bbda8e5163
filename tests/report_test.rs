use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use feedback_insights::error::FeedbackError;
use feedback_insights::filter::{FilterSpec, FilteredView};
use feedback_insights::models::{CommentRecord, DataSource, Dataset, Schema, SentimentLabel};
use feedback_insights::report::{write_report, write_report_to_file, ReportFormat};

fn record(id: Option<&str>, comment: &str, label: SentimentLabel, domain: &str, score: f64) -> CommentRecord {
    CommentRecord {
        comment_id: id.map(ToString::to_string),
        comment: comment.to_string(),
        domain: domain.to_string(),
        sentiment_label: label,
        polarity_score: score,
    }
}

fn curated() -> Dataset {
    Dataset::new(
        DataSource::Default(PathBuf::from("default.csv")),
        Schema {
            has_comment_id: true,
            has_sentiment_label: true,
            has_domain: true,
        },
        0,
        vec![
            record(Some("C1"), "Great, very helpful", SentimentLabel::Positive, "general", 0.8),
            record(Some("C2"), "App crashes, again", SentimentLabel::Negative, "technical", -0.6),
            record(Some("C3"), "It works", SentimentLabel::Neutral, "technical", 0.0),
        ],
    )
}

fn upload() -> Dataset {
    Dataset::new(
        DataSource::Upload(PathBuf::from("upload.csv")),
        Schema::default(),
        0,
        vec![record(None, "Fine", SentimentLabel::Neutral, "general", 0.0)],
    )
}

fn render(view: &FilteredView<'_>, schema: &Schema, format: ReportFormat) -> String {
    let mut buffer = Vec::new();
    write_report(&mut buffer, view, schema, format).expect("Failed to write report");
    String::from_utf8(buffer).expect("report is UTF-8")
}

#[test]
fn test_csv_report_layout() {
    let data = curated();
    let text = render(&FilteredView::all(&data), &data.schema, ReportFormat::Csv);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Metric,Value,comment_id,comment,domain,sentiment_label,polarity_score"
    );
    assert_eq!(lines[1], "Total Comments,3,,,,,");
    assert_eq!(lines[2], "Positive Comments,1 (33.3%),,,,,");
    assert_eq!(lines[3], "Negative Comments,1 (33.3%),,,,,");
    assert_eq!(lines[4], "Neutral Comments,1 (33.3%),,,,,");
    assert_eq!(lines[5], ",,C1,\"Great, very helpful\",general,positive,0.8000");
    assert_eq!(lines[7], ",,C3,It works,technical,neutral,0.0000");
    assert_eq!(lines.len(), 8);
}

#[test]
fn test_csv_report_without_comment_id() {
    let data = upload();
    let text = render(&FilteredView::all(&data), &data.schema, ReportFormat::Csv);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Metric,Value,comment,domain,sentiment_label,polarity_score");
    assert_eq!(lines[1], "Total Comments,1,,,,");
    assert_eq!(lines[5], ",,Fine,general,neutral,0.0000");
}

#[test]
fn test_report_follows_filters() {
    let data = curated();
    let view = FilterSpec::all().with_domains(["technical"]).apply(&data);
    let text = render(&view, &data.schema, ReportFormat::Csv);

    assert!(text.contains("Total Comments,2,"));
    assert!(text.contains("Positive Comments,0 (0.0%),"));
    assert!(!text.contains("C1"));
}

#[test]
fn test_json_report() {
    let data = curated();
    let text = render(&FilteredView::all(&data), &data.schema, ReportFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");

    assert_eq!(value["summary"]["total"], 3);
    assert_eq!(value["summary"]["counts"]["negative"], 1);
    assert_eq!(value["comments"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["comments"][1]["comment_id"], "C2");
    assert_eq!(value["comments"][1]["sentiment_label"], "negative");
}

#[test]
fn test_empty_view_cannot_be_exported() {
    let data = curated();
    let view = FilterSpec::all().with_keyword("nothing matches").apply(&data);

    let mut buffer = Vec::new();
    let err = write_report(&mut buffer, &view, &data.schema, ReportFormat::Csv)
        .expect_err("empty view");
    assert!(matches!(err, FeedbackError::EmptyResultSet));

    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("report.csv");
    assert!(write_report_to_file(&view, &data.schema, ReportFormat::Csv, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_write_report_to_nested_file() {
    let data = curated();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("output/nested/feedback_insights.csv");

    let rows = write_report_to_file(&FilteredView::all(&data), &data.schema, ReportFormat::Csv, &path)
        .expect("Failed to write report");
    assert_eq!(rows, 3);

    let content = fs::read_to_string(&path).expect("Failed to read report");
    assert!(content.starts_with("Metric,Value,comment_id"));
}

#[test]
fn test_report_format_parsing() {
    assert_eq!("CSV".parse::<ReportFormat>().expect("csv"), ReportFormat::Csv);
    assert_eq!("json".parse::<ReportFormat>().expect("json"), ReportFormat::Json);
    assert!("xlsx".parse::<ReportFormat>().is_err());
    assert_eq!(ReportFormat::Json.extension(), "json");
}
