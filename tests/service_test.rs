use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;
use feedback_insights::cache::DatasetCache;
use feedback_insights::dashboard::{Dashboard, DashboardSettings};
use feedback_insights::error::FeedbackError;
use feedback_insights::models::{DataSource, SentimentLabel};
use feedback_insights::report::ReportFormat;
use feedback_insights::sentiment::LexiconScorer;
use feedback_insights::service::{FeedbackService, SourceSelection};
use feedback_insights::shell::Shell;

fn bundled_dataset() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/econsult_comments_dataset.csv")
}

fn service() -> FeedbackService {
    FeedbackService::new(bundled_dataset()).expect("Failed to create service")
}

#[test]
fn test_default_dataset_is_memoized() {
    let cache = Arc::new(DatasetCache::new());
    let scorer = || LexiconScorer::new().expect("Failed to load lexicon");
    let first = FeedbackService::with_cache(bundled_dataset(), scorer(), Arc::clone(&cache));
    let second = FeedbackService::with_cache(bundled_dataset(), scorer(), Arc::clone(&cache));

    let a = first.default_dataset().expect("bundled dataset loads");
    let b = second.default_dataset().expect("bundled dataset loads");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
    assert_eq!(a.len(), 40);
}

#[test]
fn test_default_labels_are_trusted() {
    let dataset = service().default_dataset().expect("bundled dataset loads");
    let accessibility: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| r.domain == "accessibility")
        .collect();
    assert_eq!(accessibility.len(), 7);
    assert!(accessibility
        .iter()
        .all(|r| r.sentiment_label == SentimentLabel::Positive));
    assert!(dataset
        .records()
        .iter()
        .all(|r| (-1.0..=1.0).contains(&r.polarity_score)));
}

#[test]
fn test_supplied_label_kept_through_service() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("labelled.csv");
    fs::write(
        &path,
        "comment_id,comment,sentiment_label,domain\nX1,This is actually amazing!,negative,general\n",
    )
    .expect("Failed to write upload");

    let mut service = service();
    let dataset = service.upload(&path).expect("Failed to upload");
    let record = &dataset.records()[0];
    assert!(record.polarity_score > 0.5);
    assert_eq!(record.sentiment_label, SentimentLabel::Negative);
    assert_eq!(dataset.source, DataSource::Upload(path));
}

#[test]
fn test_invalid_upload_falls_back_to_default() {
    let mut service = service();
    let err = service
        .upload_reader(Path::new("bad.csv"), "text\nhello\n".as_bytes())
        .expect_err("comment column is required");
    assert!(err.is_recoverable());

    let active = service
        .active_dataset(SourceSelection::Upload)
        .expect("default dataset is available");
    assert_eq!(active.source.display_name(), "Default Dataset");
}

#[test]
fn test_missing_default_dataset_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let service = FeedbackService::new(temp_dir.path().join("absent.csv"))
        .expect("Failed to create service");
    let err = service.default_dataset().expect_err("default is missing");
    assert!(matches!(err, FeedbackError::MissingDataSource { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn test_shell_session() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let upload = temp_dir.path().join("upload.csv");
    fs::write(&upload, "comment\n\"Great support, very helpful!\"\nIt works.\n")
        .expect("Failed to write upload");
    let report = temp_dir.path().join("out/report.json");

    let script = format!(
        "help\nupload {}\nsentiment positive\nshow summary\nreport {}\nplot\nreset\nkeyword zzz\nshow search\nquit\nshow summary\n",
        upload.display(),
        report.display()
    );

    let dashboard = Dashboard::new(DashboardSettings::default()).expect("Failed to create dashboard");
    let mut shell = Shell::new(service(), dashboard, ReportFormat::Csv);
    let mut output = Vec::new();
    shell
        .run(script.as_bytes(), &mut output)
        .expect("shell session completes");
    let output = String::from_utf8(output).expect("output is UTF-8");

    assert!(output.contains("File uploaded successfully!"));
    assert!(output.contains("- Data Source: Uploaded Dataset"));
    assert!(output.contains("- Total Comments: 1"));
    assert!(output.contains("Unknown command: 'plot'"));
    assert!(output.contains("No comments found containing 'zzz'."));
    assert_eq!(shell.selection(), SourceSelection::Upload);

    let written = fs::read_to_string(&report).expect("report written");
    let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(value["summary"]["total"], 1);
}

#[test]
fn test_shell_bad_upload_message() {
    let dashboard = Dashboard::new(DashboardSettings::default()).expect("Failed to create dashboard");
    let mut shell = Shell::new(service(), dashboard, ReportFormat::Csv);
    let mut output = Vec::new();
    shell
        .run("upload missing.txt\nshow summary\n".as_bytes(), &mut output)
        .expect("shell session completes");
    let output = String::from_utf8(output).expect("output is UTF-8");

    assert!(output.contains("Error processing uploaded file"));
    assert!(output.contains("- Data Source: Default Dataset"));
}

#[test]
fn test_unreadable_upload_keeps_service_usable() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut service = service();

    let err = service
        .upload(&temp_dir.path().join("vanished.csv"))
        .expect_err("file cannot be opened");
    assert!(matches!(err, FeedbackError::UnreadableUpload { .. }));
    assert!(err.is_recoverable());
    assert!(service.uploaded().is_none());

    let active = service
        .active_dataset(SourceSelection::Upload)
        .expect("default dataset is available");
    assert_eq!(active.source.display_name(), "Default Dataset");
}

#[test]
fn test_shell_survives_unloadable_upload() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let broken = temp_dir.path().join("broken.csv");
    fs::write(&broken, b"comment\n\xff\xfe not text\n").expect("Failed to write upload");
    let short = temp_dir.path().join("short.csv");
    fs::write(&short, "comment_id,comment,domain\n1,Great app\n2,Terrible app,billing\n")
        .expect("Failed to write upload");

    let script = format!(
        "upload {}\nshow summary\nupload {}\nshow summary\n",
        broken.display(),
        short.display()
    );
    let dashboard = Dashboard::new(DashboardSettings::default()).expect("Failed to create dashboard");
    let mut shell = Shell::new(service(), dashboard, ReportFormat::Csv);
    let mut output = Vec::new();
    shell
        .run(script.as_bytes(), &mut output)
        .expect("shell session completes");
    let output = String::from_utf8(output).expect("output is UTF-8");

    assert!(output.contains("Error processing uploaded file"));
    assert!(output.contains("- Data Source: Default Dataset"));
    assert!(output.contains("Sentiment analysis applied to 2 comment(s)."));
    assert!(output.contains("- Total Comments: 2"));
}
