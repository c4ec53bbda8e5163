use std::path::{Path, PathBuf};
use feedback_insights::dashboard::{
    Dashboard, DashboardSettings, RenderedSection, Section, SectionOutcome, ViewContext,
};
use feedback_insights::filter::FilterSpec;
use feedback_insights::models::{SentimentLabel, DEFAULT_DOMAIN};
use feedback_insights::service::{FeedbackService, SourceSelection};

fn bundled_dataset() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/econsult_comments_dataset.csv")
}

fn dashboard() -> Dashboard {
    Dashboard::new(DashboardSettings {
        sample_size: 3,
        top_words: 5,
        bar_width: 20,
    })
    .expect("Failed to create dashboard")
}

fn content(rendered: &RenderedSection) -> &[String] {
    match &rendered.outcome {
        SectionOutcome::Content(lines) => lines,
        other => panic!("expected content for {}, got {other:?}", rendered.section),
    }
}

#[test]
fn test_empty_view_reports_no_data_everywhere() {
    let mut service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    service
        .upload_reader(
            Path::new("upload.csv"),
            "comment,domain\nThe captions are broken,accessibility\nTerrible queue times,billing\n".as_bytes(),
        )
        .expect("Failed to upload");
    let dataset = service
        .active_dataset(SourceSelection::Upload)
        .expect("upload is active");

    let filters = FilterSpec::all()
        .with_sentiments([SentimentLabel::Positive])
        .with_domains(["accessibility"])
        .with_keyword("captions");
    let ctx = ViewContext::new(&dataset, &filters);
    assert!(ctx.view.is_empty());

    let rendered = dashboard().render_all(&ctx);
    assert_eq!(rendered.len(), Section::ALL.len());
    for section in &rendered {
        assert!(section.is_no_data(), "{section}");
        assert!(!section.is_failed());
    }
    let search = rendered
        .iter()
        .find(|r| r.section == Section::Search)
        .expect("search shown while a keyword is set");
    assert!(search.to_string().contains("No comments found containing 'captions'."));
}

#[test]
fn test_search_section_hidden_without_keyword() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all();
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render_all(&ctx);
    assert!(rendered.iter().all(|r| r.section != Section::Search));
    assert!(rendered.iter().all(|r| !r.is_no_data() && !r.is_failed()));
}

#[test]
fn test_summary_section() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all().with_domains(["accessibility"]);
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render(Section::Summary, &ctx);
    let lines = content(&rendered);
    assert_eq!(lines[0], "- Data Source: Default Dataset");
    assert_eq!(lines[1], "- Total Comments: 7");
    assert_eq!(lines[2], "- Positive Comments: 7 (100.0%)");
    assert_eq!(lines[3], "- Negative Comments: 0 (0.0%)");
}

#[test]
fn test_recommendations_follow_balance() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all().with_domains(["accessibility", "technical", "pediatrics"]);
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render(Section::Recommendations, &ctx);
    let lines = content(&rendered);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("- Accessibility: Leverage strong positive feedback"));
    assert!(lines[1].starts_with("- Technical: Address negative feedback"));
    assert!(lines[2].starts_with("- Pediatrics: Balance neutral or mixed feedback"));
}

#[test]
fn test_keyword_search_highlights_matches() {
    let mut service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    service
        .upload_reader(
            Path::new("upload.csv"),
            "comment\nThe APP froze\nNothing to report\n".as_bytes(),
        )
        .expect("Failed to upload");
    let dataset = service
        .active_dataset(SourceSelection::Upload)
        .expect("upload is active");
    let filters = FilterSpec::all().with_keyword("app");
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render(Section::Search, &ctx);
    let lines = content(&rendered);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("| The **APP** froze"));
    assert!(lines[1].contains(DEFAULT_DOMAIN));
}

#[test]
fn test_samples_respect_sample_size() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all();
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render(Section::Samples, &ctx);
    let lines = content(&rendered);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[C001] positive"));
}

#[test]
fn test_word_frequencies_per_label() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all().with_sentiments([SentimentLabel::Negative]);
    let ctx = ViewContext::new(&dataset, &filters);

    let rendered = dashboard().render(Section::Words, &ctx);
    let lines = content(&rendered);
    assert_eq!(lines[0], "Negative Comments");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_distribution_and_domains_render() {
    let service = FeedbackService::new(bundled_dataset()).expect("Failed to create service");
    let dataset = service.default_dataset().expect("bundled dataset loads");
    let filters = FilterSpec::all();
    let ctx = ViewContext::new(&dataset, &filters);
    let dashboard = dashboard();

    let distribution = dashboard.render(Section::Distribution, &ctx);
    assert_eq!(content(&distribution).len(), 3);

    let domains = dashboard.render(Section::Domains, &ctx);
    let lines = content(&domains);
    assert!(lines[0].starts_with("Legend"));
    assert!(lines[1].starts_with("accessibility"));
}
