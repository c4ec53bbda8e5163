use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use feedback_insights::config::AppConfig;
use feedback_insights::dashboard::{Dashboard, DashboardSettings, Section, ViewContext};
use feedback_insights::error::FeedbackError;
use feedback_insights::filter::{FilterOptions, FilterSpec};
use feedback_insights::logging::{init_logging, OperationTimer};
use feedback_insights::metrics::MetricsCollector;
use feedback_insights::models::{Dataset, SentimentLabel};
use feedback_insights::report::{write_report_to_file, ReportFormat};
use feedback_insights::sentiment::LexiconScorer;
use feedback_insights::service::{FeedbackService, SourceSelection};
use feedback_insights::shell::Shell;
use feedback_insights::validation::InputValidator;
use feedback_insights::label_for_score;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write JSON logs to this file, rotated daily
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Data source and filter options shared by the view commands
#[derive(Args, Debug, Clone, Default)]
struct ViewArgs {
    /// CSV file to analyze instead of the default dataset
    #[arg(short, long)]
    upload: Option<PathBuf>,

    /// Keep only these sentiment labels (repeatable)
    #[arg(short, long)]
    sentiment: Vec<String>,

    /// Keep only these domains (repeatable)
    #[arg(short, long)]
    domain: Vec<String>,

    /// Keep only comments containing this text (case-insensitive)
    #[arg(short, long)]
    keyword: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every dashboard section
    Dashboard {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Counts and percentages per sentiment
    Summary {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Sentiment distribution bars
    Distribution {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Sentiment counts per domain
    Domains {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Most frequent words per sentiment
    Words {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Comments containing --keyword, highlighted
    Search {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Mean polarity score per sentiment with sample comments
    Intensity {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Per-domain recommendations
    Recommend {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// First comments of the filtered view
    Samples {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List the sentiment and domain values available for filtering
    Options {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export the filtered view as an insight report
    Report {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file (defaults to the configured report path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (csv or json)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Score free text and print its polarity and derived label
    Score {
        /// Text to score; words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Interactive dashboard session
    Shell,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<FeedbackError>() {
                Some(FeedbackError::MissingDataSource { .. }) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging; the guard flushes the log file on exit
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.get_log_level());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file_path.as_ref().map(PathBuf::from));
    let _guard = init_logging(
        Some(&log_level),
        log_file.as_deref(),
        config.logging.format == "json",
    )?;

    MetricsCollector::init()?;
    info!("Starting feedback-insights");

    match cli.command {
        Commands::Dashboard { view } => show_sections(&config, &view, None),
        Commands::Summary { view } => show_sections(&config, &view, Some(Section::Summary)),
        Commands::Distribution { view } => {
            show_sections(&config, &view, Some(Section::Distribution))
        }
        Commands::Domains { view } => show_sections(&config, &view, Some(Section::Domains)),
        Commands::Words { view } => show_sections(&config, &view, Some(Section::Words)),
        Commands::Search { view } => {
            if view.keyword.as_deref().map_or(true, |k| k.trim().is_empty()) {
                return Err(anyhow!("search requires --keyword <TEXT>"));
            }
            show_sections(&config, &view, Some(Section::Search))
        }
        Commands::Intensity { view } => show_sections(&config, &view, Some(Section::Intensity)),
        Commands::Recommend { view } => {
            show_sections(&config, &view, Some(Section::Recommendations))
        }
        Commands::Samples { view } => show_sections(&config, &view, Some(Section::Samples)),
        Commands::Options { view } => list_options(&config, &view),
        Commands::Report {
            view,
            output,
            format,
        } => export_report(&config, &view, output, format.as_deref()),
        Commands::Score { text } => score_text(&text.join(" ")),
        Commands::Shell => run_shell(&config),
    }
}

/// Build the session service from configuration
fn build_service(config: &AppConfig) -> Result<FeedbackService> {
    FeedbackService::new(config.default_data_path()).context("Failed to initialize sentiment scorer")
}

/// Load the dataset the view arguments select
///
/// An upload that fails validation or loading is reported and the default
/// dataset is used instead.
fn open_dataset(service: &mut FeedbackService, view: &ViewArgs) -> Result<Arc<Dataset>> {
    let timer = OperationTimer::new("open_dataset");
    let selection = match &view.upload {
        Some(path) => {
            let uploaded = InputValidator::validate_upload_path(path)
                .map_err(|e| FeedbackError::InvalidInput(e.to_string()))
                .and_then(|()| service.upload(path));
            if let Err(e) = uploaded {
                warn!("Upload rejected: {}", e);
                eprintln!("Error processing uploaded file: {e}");
                eprintln!("Showing the default dataset instead.");
            }
            SourceSelection::Upload
        }
        None => SourceSelection::Default,
    };
    let dataset = service.active_dataset(selection)?;
    timer.finish();
    Ok(dataset)
}

/// Translate view arguments into a filter selection
fn filter_spec(view: &ViewArgs) -> Result<FilterSpec> {
    let mut spec = FilterSpec::all();

    if !view.sentiment.is_empty() {
        let labels = view
            .sentiment
            .iter()
            .map(|s| InputValidator::validate_sentiment(s))
            .collect::<Result<Vec<SentimentLabel>>>()?;
        spec = spec.with_sentiments(labels);
    }

    if !view.domain.is_empty() {
        for domain in &view.domain {
            InputValidator::validate_domain(domain)?;
        }
        spec = spec.with_domains(&view.domain);
    }

    if let Some(keyword) = &view.keyword {
        InputValidator::validate_keyword(keyword)?;
        spec = spec.with_keyword(InputValidator::sanitize_text(keyword));
    }

    Ok(spec)
}

/// Render one section, or all of them
fn show_sections(config: &AppConfig, view: &ViewArgs, section: Option<Section>) -> Result<()> {
    let filters = filter_spec(view)?;
    let mut service = build_service(config)?;
    let dataset = open_dataset(&mut service, view)?;
    let dashboard = Dashboard::new(DashboardSettings::from(&config.dashboard))?;

    let ctx = ViewContext::new(&dataset, &filters);
    let rendered = match section {
        Some(section) => vec![dashboard.render(section, &ctx)],
        None => dashboard.render_all(&ctx),
    };
    for section in rendered {
        println!("{section}");
    }
    Ok(())
}

/// Print the filter values available in the selected dataset
fn list_options(config: &AppConfig, view: &ViewArgs) -> Result<()> {
    let mut service = build_service(config)?;
    let dataset = open_dataset(&mut service, view)?;
    let options = FilterOptions::from_dataset(&dataset);

    println!("Source: {}", dataset.source.display_name());
    println!("Comments: {} ({} row(s) dropped)", dataset.len(), dataset.dropped_rows);
    let labels: Vec<&str> = options.sentiments.iter().map(SentimentLabel::as_str).collect();
    println!("Sentiments: {}", labels.join(", "));
    println!("Domains: {}", options.domains.join(", "));
    Ok(())
}

/// Write the filtered view to a report file
fn export_report(
    config: &AppConfig,
    view: &ViewArgs,
    output: Option<PathBuf>,
    format: Option<&str>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| config.default_report_path());
    InputValidator::validate_report_path(&output)?;
    let format = resolve_format(&output, format, &config.report.default_format)?;

    let filters = filter_spec(view)?;
    let mut service = build_service(config)?;
    let dataset = open_dataset(&mut service, view)?;
    let filtered = filters.apply(&dataset);

    match write_report_to_file(&filtered, &dataset.schema, format, &output) {
        Ok(rows) => {
            println!("Wrote {rows} comment(s) to {}", output.display());
            Ok(())
        }
        Err(FeedbackError::EmptyResultSet) => {
            println!("No data available to download.");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to write report to {}", output.display())),
    }
}

/// Explicit format, else the output extension, else the configured default
fn resolve_format(output: &Path, explicit: Option<&str>, configured: &str) -> Result<ReportFormat> {
    if let Some(format) = explicit {
        return Ok(format.parse()?);
    }
    if let Some(format) = output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
    {
        return Ok(format);
    }
    Ok(configured.parse()?)
}

/// Score ad-hoc text with the bundled lexicon
fn score_text(text: &str) -> Result<()> {
    let scorer = LexiconScorer::new()?;
    let score = scorer.compound(text);
    println!("{score:.4}\t{}", label_for_score(score));
    Ok(())
}

/// Run the interactive shell on stdin/stdout
fn run_shell(config: &AppConfig) -> Result<()> {
    let service = build_service(config)?;
    // Fail early when the default dataset is missing
    service.default_dataset()?;

    let dashboard = Dashboard::new(DashboardSettings::from(&config.dashboard))?;
    let default_format: ReportFormat = config.report.default_format.parse()?;
    let mut shell = Shell::new(service, dashboard, default_format);

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell.run(stdin.lock(), stdout.lock())?;
    info!("Shell session ended");
    Ok(())
}
