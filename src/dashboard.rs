//! Text rendering of the dashboard sections
//!
//! Every section renders independently from the same [`ViewContext`]. An empty
//! view produces a "no data" notice for that section, and a failure inside one
//! section is reported in that section only; the rest still render.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::analytics::{
    average_scores, capitalize, domain_breakdown, highlight_keyword, recommendations,
    sentiment_distribution, Summary,
};
use crate::config::DashboardConfig;
use crate::error::{FeedbackError, Result};
use crate::filter::{FilterSpec, FilteredView};
use crate::metrics::MetricsCollector;
use crate::models::{CommentRecord, DataSource, Dataset, SentimentLabel};
use crate::nlp::NlpProcessor;

/// A dashboard panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Counts and percentages per label
    Summary,
    /// Share of each label, as text bars
    Distribution,
    /// Stacked label counts per domain
    Domains,
    /// Most frequent words per label
    Words,
    /// Rows matching the keyword, highlighted
    Search,
    /// Mean polarity per label with sample rows
    Intensity,
    /// Per-domain advice
    Recommendations,
    /// First rows of the view
    Samples,
    /// Closing narrative for the active source
    Insights,
}

impl Section {
    /// Sections in dashboard order
    pub const ALL: [Self; 9] = [
        Self::Summary,
        Self::Distribution,
        Self::Domains,
        Self::Words,
        Self::Search,
        Self::Intensity,
        Self::Recommendations,
        Self::Samples,
        Self::Insights,
    ];

    /// Short name used on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Distribution => "distribution",
            Self::Domains => "domains",
            Self::Words => "words",
            Self::Search => "search",
            Self::Intensity => "intensity",
            Self::Recommendations => "recommend",
            Self::Samples => "samples",
            Self::Insights => "insights",
        }
    }

    /// Heading shown above the section
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Distribution => "Sentiment Distribution",
            Self::Domains => "Domain-wise Sentiment Analysis",
            Self::Words => "Comment Word Frequencies",
            Self::Search => "Keyword Search Results",
            Self::Intensity => "Sentiment Intensity Breakdown",
            Self::Recommendations => "Actionable Recommendations",
            Self::Samples => "Sample Comments",
            Self::Insights => "Conclusion",
        }
    }

    fn no_data_notice(self, keyword: Option<&str>) -> String {
        match self {
            Self::Summary => {
                "No data matches the selected filters or keyword. Please adjust the filters.".to_string()
            }
            Self::Distribution => "No data to display for sentiment distribution.".to_string(),
            Self::Domains => "No data to display for domain-wise sentiment analysis.".to_string(),
            Self::Words => "No comments to display for word frequencies.".to_string(),
            Self::Search => keyword.map_or_else(
                || "No keyword set. Use a keyword to search comments.".to_string(),
                |keyword| format!("No comments found containing '{keyword}'."),
            ),
            Self::Intensity => "No sentiment intensity data available.".to_string(),
            Self::Recommendations => "No data available for recommendations.".to_string(),
            Self::Samples => "No comments to display for the selected filters.".to_string(),
            Self::Insights => "No data available for insights.".to_string(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.name() == wanted)
            .or(match wanted.as_str() {
                "recommendations" => Some(Self::Recommendations),
                "conclusion" => Some(Self::Insights),
                _ => None,
            })
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(Section::name).collect();
                FeedbackError::InvalidInput(format!(
                    "Unknown section: '{wanted}'. Must be one of: {}",
                    names.join(", ")
                ))
            })
    }
}

/// What a section produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    /// Rendered lines
    Content(Vec<String>),
    /// The view had nothing to show
    NoData(String),
    /// Rendering failed; the message is shown in place of the section
    Failed(String),
}

/// A section together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    /// Which section
    pub section: Section,
    /// What it produced
    pub outcome: SectionOutcome,
}

impl RenderedSection {
    fn from_result(section: Section, keyword: Option<&str>, result: Result<Vec<String>>) -> Self {
        let outcome = match result {
            Ok(lines) => SectionOutcome::Content(lines),
            Err(FeedbackError::EmptyResultSet) => {
                SectionOutcome::NoData(section.no_data_notice(keyword))
            }
            Err(e) => {
                let error = match e {
                    render @ FeedbackError::Render { .. } => render,
                    other => FeedbackError::Render {
                        section: section.title().to_lowercase(),
                        message: other.to_string(),
                    },
                };
                warn!(section = section.name(), "{}", error);
                MetricsCollector::default().record_error(error.kind(), section.name());
                SectionOutcome::Failed(error.to_string())
            }
        };
        Self { section, outcome }
    }

    /// True when the section showed its "no data" notice
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self.outcome, SectionOutcome::NoData(_))
    }

    /// True when the section failed to render
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Failed(_))
    }
}

impl fmt::Display for RenderedSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.section.title();
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;
        match &self.outcome {
            SectionOutcome::Content(lines) => {
                for line in lines {
                    writeln!(f, "{line}")?;
                }
                Ok(())
            }
            SectionOutcome::NoData(notice) => writeln!(f, "! {notice}"),
            SectionOutcome::Failed(message) => writeln!(f, "x {message}"),
        }
    }
}

/// Everything a section needs: the dataset, the current view and the keyword
#[derive(Debug)]
pub struct ViewContext<'a> {
    /// Dataset the view was cut from
    pub dataset: &'a Dataset,
    /// Records that passed the filters
    pub view: FilteredView<'a>,
    /// Active keyword, if any
    pub keyword: Option<&'a str>,
}

impl<'a> ViewContext<'a> {
    /// Apply `filters` to `dataset`
    #[must_use]
    pub fn new(dataset: &'a Dataset, filters: &'a FilterSpec) -> Self {
        Self {
            dataset,
            view: filters.apply(dataset),
            keyword: filters.active_keyword(),
        }
    }
}

/// Layout knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Rows in sample tables
    pub sample_size: usize,
    /// Words per label in the word frequency section
    pub top_words: usize,
    /// Characters in a full-width bar
    pub bar_width: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            sample_size: 10,
            top_words: 15,
            bar_width: 40,
        }
    }
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            sample_size: config.sample_size,
            top_words: config.top_words,
            bar_width: config.bar_width,
        }
    }
}

/// Renders dashboard sections as plain text
pub struct Dashboard {
    settings: DashboardSettings,
    nlp: NlpProcessor,
}

impl Dashboard {
    /// Create a dashboard with its own text processor
    pub fn new(settings: DashboardSettings) -> Result<Self> {
        Ok(Self {
            settings,
            nlp: NlpProcessor::new()?,
        })
    }

    /// Current layout settings
    #[must_use]
    pub const fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Render every section in order
    ///
    /// The keyword search section only appears while a keyword is set.
    #[must_use]
    pub fn render_all(&self, ctx: &ViewContext<'_>) -> Vec<RenderedSection> {
        Section::ALL
            .into_iter()
            .filter(|section| *section != Section::Search || ctx.keyword.is_some())
            .map(|section| self.render(section, ctx))
            .collect()
    }

    /// Render one section
    #[must_use]
    pub fn render(&self, section: Section, ctx: &ViewContext<'_>) -> RenderedSection {
        debug!(section = section.name(), rows = ctx.view.len(), "Rendering section");
        let result = match section {
            Section::Summary => Self::summary(ctx),
            Section::Distribution => self.distribution(&ctx.view),
            Section::Domains => self.domains(&ctx.view),
            Section::Words => self.words(&ctx.view),
            Section::Search => Self::search(ctx),
            Section::Intensity => self.intensity(ctx),
            Section::Recommendations => Self::recommendations(&ctx.view),
            Section::Samples => self.samples(ctx),
            Section::Insights => Self::insights(ctx),
        };
        RenderedSection::from_result(section, ctx.keyword, result)
    }

    fn summary(ctx: &ViewContext<'_>) -> Result<Vec<String>> {
        let summary = Summary::from_view(&ctx.view)?;
        let mut lines = vec![format!("- Data Source: {}", ctx.dataset.source.display_name())];
        lines.extend(
            summary
                .metric_rows()
                .into_iter()
                .map(|(metric, value)| format!("- {metric}: {value}")),
        );
        Ok(lines)
    }

    fn distribution(&self, view: &FilteredView<'_>) -> Result<Vec<String>> {
        Ok(sentiment_distribution(view)?
            .into_iter()
            .map(|slice| {
                format!(
                    "{:<9} {:<width$} {:>4} ({:.1}%)",
                    slice.label.as_str(),
                    bar('#', slice.count, view.len(), self.settings.bar_width),
                    slice.count,
                    slice.percentage,
                    width = self.settings.bar_width,
                )
            })
            .collect())
    }

    fn domains(&self, view: &FilteredView<'_>) -> Result<Vec<String>> {
        let breakdown = domain_breakdown(view)?;
        let widest = breakdown.iter().map(|d| d.counts.total()).max().unwrap_or(0);
        let name_width = breakdown
            .iter()
            .map(|d| d.domain.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec!["Legend: + positive, - negative, . neutral".to_string()];
        for entry in &breakdown {
            let stacked: String = [
                bar('+', entry.counts.positive, widest, self.settings.bar_width),
                bar('-', entry.counts.negative, widest, self.settings.bar_width),
                bar('.', entry.counts.neutral, widest, self.settings.bar_width),
            ]
            .concat();
            lines.push(format!(
                "{:<name_width$} {:<width$} positive {} / negative {} / neutral {}",
                entry.domain,
                stacked,
                entry.counts.positive,
                entry.counts.negative,
                entry.counts.neutral,
                width = self.settings.bar_width + 2,
            ));
        }
        Ok(lines)
    }

    fn words(&self, view: &FilteredView<'_>) -> Result<Vec<String>> {
        if view.is_empty() {
            return Err(FeedbackError::EmptyResultSet);
        }
        let mut lines = Vec::new();
        for label in SentimentLabel::ALL {
            let comments: Vec<&str> = view.with_label(label).map(|r| r.comment.as_str()).collect();
            if comments.is_empty() {
                continue;
            }
            let words = self.nlp.word_frequencies(comments, self.settings.top_words);
            lines.push(format!("{} Comments", label.title()));
            if words.is_empty() {
                lines.push("  (no content words)".to_string());
            } else {
                let listed: Vec<String> = words
                    .iter()
                    .map(|w| format!("{} ({})", w.word, w.count))
                    .collect();
                lines.push(format!("  {}", listed.join(", ")));
            }
        }
        Ok(lines)
    }

    fn search(ctx: &ViewContext<'_>) -> Result<Vec<String>> {
        let keyword = ctx.keyword.ok_or(FeedbackError::EmptyResultSet)?;
        if ctx.view.is_empty() {
            return Err(FeedbackError::EmptyResultSet);
        }
        let include_id = ctx.dataset.schema.has_comment_id;
        let mut lines = vec![format!("{} comment(s) containing '{keyword}'", ctx.view.len())];
        lines.extend(ctx.view.iter().map(|record| {
            let highlighted = CommentRecord {
                comment: highlight_keyword(&record.comment, keyword),
                ..record.clone()
            };
            record_line(&highlighted, include_id)
        }));
        Ok(lines)
    }

    fn intensity(&self, ctx: &ViewContext<'_>) -> Result<Vec<String>> {
        let averages = average_scores(&ctx.view)?;
        let mut lines = vec!["Average polarity scores by sentiment:".to_string()];
        lines.extend(averages.iter().map(|entry| {
            format!(
                "  {:<9} {:>7.4}  ({} comment(s))",
                entry.label.as_str(),
                entry.mean_score,
                entry.count
            )
        }));
        lines.push("Sample comments with polarity scores:".to_string());
        lines.extend(self.sample_lines(ctx));
        Ok(lines)
    }

    fn recommendations(view: &FilteredView<'_>) -> Result<Vec<String>> {
        Ok(recommendations(view)?
            .iter()
            .map(|rec| format!("- {}", rec.message()))
            .collect())
    }

    fn samples(&self, ctx: &ViewContext<'_>) -> Result<Vec<String>> {
        if ctx.view.is_empty() {
            return Err(FeedbackError::EmptyResultSet);
        }
        Ok(self.sample_lines(ctx))
    }

    fn sample_lines(&self, ctx: &ViewContext<'_>) -> Vec<String> {
        let include_id = ctx.dataset.schema.has_comment_id;
        ctx.view
            .iter()
            .take(self.settings.sample_size)
            .map(|record| record_line(record, include_id))
            .collect()
    }

    fn insights(ctx: &ViewContext<'_>) -> Result<Vec<String>> {
        let summary = Summary::from_view(&ctx.view)?;
        let breakdown = domain_breakdown(&ctx.view)?;

        let mut lines = Vec::new();
        if let DataSource::Upload(_) = ctx.dataset.source {
            lines.push(
                "Your uploaded dataset was scored for polarity and every comment carries a \
                 positive, negative or neutral label."
                    .to_string(),
            );
        }

        let unanimous: Vec<String> = breakdown
            .iter()
            .filter(|d| d.counts.positive > 0 && d.counts.positive == d.counts.total())
            .map(|d| capitalize(&d.domain))
            .collect();
        if !unanimous.is_empty() {
            lines.push(format!(
                "Unanimously positive domain(s): {}.",
                unanimous.join(", ")
            ));
        }

        if let Some(worst) = breakdown
            .iter()
            .filter(|d| d.counts.negative > 0)
            .max_by_key(|d| d.counts.negative)
        {
            lines.push(format!(
                "Most negative feedback comes from {} ({} comment(s)).",
                capitalize(&worst.domain),
                worst.counts.negative
            ));
        }

        lines.push(format!(
            "Overall: {:.1}% positive, {:.1}% negative, {:.1}% neutral across {} comment(s).",
            summary.positive_pct, summary.negative_pct, summary.neutral_pct, summary.total
        ));
        Ok(lines)
    }
}

/// One table row: `[id] label score domain | comment`
fn record_line(record: &CommentRecord, include_id: bool) -> String {
    let id = if include_id {
        format!("[{}] ", record.comment_id.as_deref().unwrap_or("-"))
    } else {
        String::new()
    };
    format!(
        "{id}{:<8} {:>7.4}  {:<14} | {}",
        record.sentiment_label.as_str(),
        record.polarity_score,
        record.domain,
        record.comment
    )
}

/// `fill` repeated in proportion to `count / max` of `width`; never empty for a non-zero count
fn bar(fill: char, count: usize, max: usize, width: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let length = ((count as f64 / max as f64) * width as f64).round() as usize;
    std::iter::repeat(fill).take(length.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names_round_trip() {
        for section in Section::ALL {
            assert_eq!(section.name().parse::<Section>().expect("known"), section);
        }
        assert_eq!("Recommendations".parse::<Section>().expect("alias"), Section::Recommendations);
        assert!("charts".parse::<Section>().is_err());
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar('#', 0, 10, 20), "");
        assert_eq!(bar('#', 5, 10, 20).len(), 10);
        assert_eq!(bar('#', 1, 1000, 20), "#");
    }

    #[test]
    fn test_failures_are_scoped_to_the_section() {
        let rendered = RenderedSection::from_result(
            Section::Domains,
            None,
            Err(FeedbackError::Other("chart backend unavailable".to_string())),
        );
        assert!(rendered.is_failed());
        let text = rendered.to_string();
        assert!(text.contains("Error creating domain-wise sentiment analysis"));
        assert!(text.contains("chart backend unavailable"));
    }

    #[test]
    fn test_empty_result_becomes_notice() {
        let rendered =
            RenderedSection::from_result(Section::Search, Some("zzz"), Err(FeedbackError::EmptyResultSet));
        assert!(rendered.is_no_data());
        assert!(rendered.to_string().contains("No comments found containing 'zzz'."));
    }

    #[test]
    fn test_record_line_with_id() {
        let record = CommentRecord {
            comment_id: Some("C7".to_string()),
            comment: "Fine".to_string(),
            domain: "general".to_string(),
            sentiment_label: SentimentLabel::Neutral,
            polarity_score: 0.0,
        };
        let line = record_line(&record, true);
        assert!(line.starts_with("[C7] neutral"));
        assert!(line.ends_with("| Fine"));
    }
}
