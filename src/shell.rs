//! Line-oriented interactive dashboard
//!
//! Each command changes one piece of session state (source, filters, keyword)
//! and the affected view is recomputed from the immutable base table.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dashboard::{Dashboard, Section, ViewContext};
use crate::error::{FeedbackError, Result};
use crate::filter::{FilterOptions, FilterSpec};
use crate::models::SentimentLabel;
use crate::report::{write_report_to_file, ReportFormat};
use crate::sentiment::{LexiconScorer, PolarityScorer};
use crate::service::{FeedbackService, SourceSelection};
use crate::validation::InputValidator;

const HELP: &str = "\
Commands:
  source default|upload      choose the data source
  upload <file.csv>          load and classify a CSV file
  sentiment <label>...|all   keep only these labels (positive, negative, neutral)
  domain <d1>[, <d2>...]|all keep only these comma-separated domains
  keyword [text]             search comments; no text clears the search
  reset                      clear every filter
  show [section]             render one section, or the whole dashboard
  report <path> [csv|json]   export the current view
  options                    list the filter values available
  help                       show this help
  quit                       leave the shell";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the data source
    Source(SourceSelection),
    /// Upload a CSV file
    Upload(PathBuf),
    /// Set the label filter; `None` selects all
    Sentiment(Option<Vec<SentimentLabel>>),
    /// Set the domain filter; `None` selects all
    Domain(Option<Vec<String>>),
    /// Set or clear the keyword
    Keyword(String),
    /// Clear every filter
    Reset,
    /// Render one section or the whole dashboard
    Show(Option<Section>),
    /// Export the view
    Report(PathBuf, Option<ReportFormat>),
    /// List filter options
    Options,
    /// Print help
    Help,
    /// Leave the shell
    Quit,
}

impl Command {
    /// Parse one input line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = InputValidator::sanitize_text(line);
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line.as_str(), ""), |(name, rest)| (name, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name.to_lowercase().as_str() {
            "source" => match rest.to_lowercase().as_str() {
                "default" => Self::Source(SourceSelection::Default),
                "upload" => Self::Source(SourceSelection::Upload),
                _ => return Err(usage("source default|upload")),
            },
            "upload" => {
                if rest.is_empty() {
                    return Err(usage("upload <file.csv>"));
                }
                Self::Upload(PathBuf::from(rest))
            }
            "sentiment" => {
                if args.is_empty() {
                    return Err(usage("sentiment <label>...|all"));
                }
                if is_all(&args) {
                    Self::Sentiment(None)
                } else {
                    let labels = args
                        .iter()
                        .map(|arg| arg.parse::<SentimentLabel>())
                        .collect::<Result<Vec<_>>>()?;
                    Self::Sentiment(Some(labels))
                }
            }
            "domain" => {
                // comma-separated so domain names may contain spaces
                let domains: Vec<&str> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .collect();
                if domains.is_empty() {
                    return Err(usage("domain <d1>[, <d2>...]|all"));
                }
                if is_all(&domains) {
                    Self::Domain(None)
                } else {
                    for domain in &domains {
                        InputValidator::validate_domain(domain).map_err(invalid)?;
                    }
                    Self::Domain(Some(domains.iter().map(ToString::to_string).collect()))
                }
            }
            "keyword" | "search" => {
                InputValidator::validate_keyword(rest).map_err(invalid)?;
                Self::Keyword(rest.to_string())
            }
            "reset" => Self::Reset,
            "show" => {
                if rest.is_empty() || rest.eq_ignore_ascii_case("all") {
                    Self::Show(None)
                } else {
                    Self::Show(Some(rest.parse()?))
                }
            }
            "report" | "export" => match args.as_slice() {
                [path] => Self::Report(PathBuf::from(path), None),
                [path, format] => Self::Report(PathBuf::from(path), Some(format.parse()?)),
                _ => return Err(usage("report <path> [csv|json]")),
            },
            "options" => Self::Options,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(FeedbackError::InvalidInput(format!(
                    "Unknown command: '{other}'. Type 'help' for a list of commands."
                )))
            }
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> FeedbackError {
    FeedbackError::InvalidInput(format!("Usage: {text}"))
}

fn invalid(e: anyhow::Error) -> FeedbackError {
    FeedbackError::InvalidInput(e.to_string())
}

fn is_all(args: &[&str]) -> bool {
    matches!(args, [only] if only.eq_ignore_ascii_case("all"))
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Stop
    Quit,
}

/// Interactive session state
pub struct Shell<S = LexiconScorer> {
    service: FeedbackService<S>,
    dashboard: Dashboard,
    selection: SourceSelection,
    filters: FilterSpec,
    default_format: ReportFormat,
}

impl<S: PolarityScorer> Shell<S> {
    /// New session showing the default dataset with no filters
    pub fn new(service: FeedbackService<S>, dashboard: Dashboard, default_format: ReportFormat) -> Self {
        Self {
            service,
            dashboard,
            selection: SourceSelection::Default,
            filters: FilterSpec::all(),
            default_format,
        }
    }

    /// Current filters
    pub const fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Current source selection
    pub const fn selection(&self) -> SourceSelection {
        self.selection
    }

    /// Read commands until `quit` or end of input
    ///
    /// Recoverable errors are printed and the loop continues; anything else ends
    /// the session with that error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "Feedback insights shell. Type 'help' for commands.")?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let flow = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command, &mut output),
                Ok(None) => Ok(Flow::Continue),
                Err(e) => Err(e),
            };
            match flow {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) if e.is_recoverable() => writeln!(output, "{e}")?,
                Err(e) => return Err(e),
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }

    /// Run a single command
    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<Flow> {
        debug!(?command, "Executing shell command");
        match command {
            Command::Source(selection) => {
                self.selection = selection;
                if selection == SourceSelection::Upload && self.service.uploaded().is_none() {
                    writeln!(
                        output,
                        "No valid upload is active; showing the default dataset."
                    )?;
                } else {
                    writeln!(output, "Source set to {}.", self.dataset_name()?)?;
                }
            }
            Command::Upload(path) => self.upload(&path, output)?,
            Command::Sentiment(labels) => {
                self.filters.sentiments = labels.map(|labels| labels.into_iter().collect());
                writeln!(output, "Sentiment filter updated.")?;
            }
            Command::Domain(domains) => {
                self.filters = match domains {
                    Some(domains) => self.filters.clone().with_domains(domains),
                    None => FilterSpec {
                        domains: None,
                        ..self.filters.clone()
                    },
                };
                writeln!(output, "Domain filter updated.")?;
            }
            Command::Keyword(keyword) => {
                self.filters = self.filters.clone().with_keyword(keyword);
                match self.filters.active_keyword() {
                    Some(keyword) => writeln!(output, "Searching for '{keyword}'.")?,
                    None => writeln!(output, "Keyword search cleared.")?,
                }
            }
            Command::Reset => {
                self.filters = FilterSpec::all();
                writeln!(output, "Filters cleared.")?;
            }
            Command::Show(section) => self.show(section, output)?,
            Command::Report(path, format) => self.report(&path, format, output)?,
            Command::Options => self.options(output)?,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn dataset_name(&self) -> Result<&'static str> {
        Ok(self
            .service
            .active_dataset(self.selection)?
            .source
            .display_name())
    }

    fn upload<W: Write>(&mut self, path: &Path, output: &mut W) -> Result<()> {
        self.selection = SourceSelection::Upload;
        let checked = InputValidator::validate_upload_path(path).map_err(invalid);
        match checked.and_then(|()| self.service.upload(path)) {
            Ok(dataset) => {
                info!(path = %path.display(), rows = dataset.len(), "Upload accepted");
                writeln!(
                    output,
                    "File uploaded successfully! Sentiment analysis applied to {} comment(s).",
                    dataset.len()
                )?;
            }
            // a failed upload never ends the session
            Err(e) => {
                warn!(path = %path.display(), kind = e.kind(), "Upload rejected: {}", e);
                self.service.clear_upload();
                writeln!(output, "Error processing uploaded file: {e}")?;
                writeln!(output, "Showing the default dataset instead.")?;
            }
        }
        Ok(())
    }

    fn show<W: Write>(&self, section: Option<Section>, output: &mut W) -> Result<()> {
        let dataset = self.service.active_dataset(self.selection)?;
        let ctx = ViewContext::new(&dataset, &self.filters);
        let rendered = match section {
            Some(section) => vec![self.dashboard.render(section, &ctx)],
            None => self.dashboard.render_all(&ctx),
        };
        for section in rendered {
            writeln!(output, "{section}")?;
        }
        Ok(())
    }

    fn report<W: Write>(&self, path: &Path, format: Option<ReportFormat>, output: &mut W) -> Result<()> {
        InputValidator::validate_report_path(path).map_err(invalid)?;
        let format = format
            .or_else(|| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ext.parse().ok())
            })
            .unwrap_or(self.default_format);

        let dataset = self.service.active_dataset(self.selection)?;
        let view = self.filters.apply(&dataset);
        match write_report_to_file(&view, &dataset.schema, format, path) {
            Ok(rows) => writeln!(
                output,
                "Wrote {rows} comment(s) to {} ({}).",
                path.display(),
                format.extension()
            )?,
            Err(FeedbackError::EmptyResultSet) => {
                writeln!(output, "No data available to download.")?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn options<W: Write>(&self, output: &mut W) -> Result<()> {
        let dataset = self.service.active_dataset(self.selection)?;
        let options = FilterOptions::from_dataset(&dataset);
        let labels: Vec<&str> = options.sentiments.iter().map(SentimentLabel::as_str).collect();
        writeln!(output, "Source: {}", dataset.source.display_name())?;
        writeln!(output, "Sentiments: {}", labels.join(", "))?;
        writeln!(output, "Domains: {}", options.domains.join(", "))?;
        Ok(())
    }
}
