//! Aggregates computed over a filtered view
//!
//! Every aggregate refuses an empty view with `EmptyResultSet` so callers can
//! show a "no data" notice instead of zeros.

use regex::RegexBuilder;
use serde::Serialize;

use crate::error::{FeedbackError, Result};
use crate::filter::FilteredView;
use crate::models::SentimentLabel;

/// Per-label record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    /// Positive records
    pub positive: usize,
    /// Negative records
    pub negative: usize,
    /// Neutral records
    pub neutral: usize,
}

impl LabelCounts {
    /// Count the labels in a view
    #[must_use]
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let mut counts = Self::default();
        for record in view.iter() {
            counts.add(record.sentiment_label);
        }
        counts
    }

    fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    /// Count for one label
    #[must_use]
    pub const fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Sum over all labels
    #[must_use]
    pub const fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Share of `part` in `total` as a percentage; zero when `total` is zero
#[must_use]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// `N (P.P%)`, the format used in the summary and the report
#[must_use]
pub fn count_with_percentage(part: usize, total: usize) -> String {
    format!("{part} ({:.1}%)", percentage(part, total))
}

/// Summary panel figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Records in the view
    pub total: usize,
    /// Per-label counts
    pub counts: LabelCounts,
    /// Positive share in percent
    pub positive_pct: f64,
    /// Negative share in percent
    pub negative_pct: f64,
    /// Neutral share in percent
    pub neutral_pct: f64,
}

impl Summary {
    /// Summarize a non-empty view
    pub fn from_view(view: &FilteredView<'_>) -> Result<Self> {
        if view.is_empty() {
            return Err(FeedbackError::EmptyResultSet);
        }
        let counts = LabelCounts::from_view(view);
        let total = view.len();
        Ok(Self {
            total,
            counts,
            positive_pct: percentage(counts.positive, total),
            negative_pct: percentage(counts.negative, total),
            neutral_pct: percentage(counts.neutral, total),
        })
    }

    /// Metric/value rows: total, positive, negative, neutral
    #[must_use]
    pub fn metric_rows(&self) -> [(&'static str, String); 4] {
        [
            ("Total Comments", self.total.to_string()),
            (
                "Positive Comments",
                count_with_percentage(self.counts.positive, self.total),
            ),
            (
                "Negative Comments",
                count_with_percentage(self.counts.negative, self.total),
            ),
            (
                "Neutral Comments",
                count_with_percentage(self.counts.neutral, self.total),
            ),
        ]
    }
}

/// One slice of the sentiment distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    /// Label of the slice
    pub label: SentimentLabel,
    /// Records with that label
    pub count: usize,
    /// Share of the view in percent
    pub percentage: f64,
}

/// Labels present in the view, largest first (ties in label order)
pub fn sentiment_distribution(view: &FilteredView<'_>) -> Result<Vec<DistributionSlice>> {
    if view.is_empty() {
        return Err(FeedbackError::EmptyResultSet);
    }
    let counts = LabelCounts::from_view(view);
    let mut slices: Vec<DistributionSlice> = SentimentLabel::ALL
        .iter()
        .filter(|label| counts.get(**label) > 0)
        .map(|&label| DistributionSlice {
            label,
            count: counts.get(label),
            percentage: percentage(counts.get(label), view.len()),
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(slices)
}

/// Label counts for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainBreakdown {
    /// Domain name
    pub domain: String,
    /// Label counts within the domain
    pub counts: LabelCounts,
}

/// Per-domain label counts, domains in first-appearance order
pub fn domain_breakdown(view: &FilteredView<'_>) -> Result<Vec<DomainBreakdown>> {
    if view.is_empty() {
        return Err(FeedbackError::EmptyResultSet);
    }
    let mut breakdown: Vec<DomainBreakdown> = Vec::new();
    for record in view.iter() {
        if let Some(entry) = breakdown.iter_mut().find(|e| e.domain == record.domain) {
            entry.counts.add(record.sentiment_label);
        } else {
            let mut counts = LabelCounts::default();
            counts.add(record.sentiment_label);
            breakdown.push(DomainBreakdown {
                domain: record.domain.clone(),
                counts,
            });
        }
    }
    Ok(breakdown)
}

/// Mean polarity of one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelIntensity {
    /// Label
    pub label: SentimentLabel,
    /// Mean polarity score of records with this label
    pub mean_score: f64,
    /// Records averaged
    pub count: usize,
}

/// Mean polarity per label present in the view, in label order
pub fn average_scores(view: &FilteredView<'_>) -> Result<Vec<LabelIntensity>> {
    if view.is_empty() {
        return Err(FeedbackError::EmptyResultSet);
    }
    Ok(SentimentLabel::ALL
        .iter()
        .filter_map(|&label| {
            let (sum, count) = view
                .with_label(label)
                .fold((0.0, 0_usize), |(sum, count), r| (sum + r.polarity_score, count + 1));
            (count > 0).then(|| LabelIntensity {
                label,
                mean_score: sum / count as f64,
                count,
            })
        })
        .collect())
}

/// What a domain's feedback balance suggests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Negative outweighs positive
    AddressNegative,
    /// Positive outweighs negative
    LeveragePositive,
    /// Tied
    BalanceMixed,
}

/// Recommendation for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Domain the advice is for
    pub domain: String,
    /// Which way the balance tipped
    pub kind: RecommendationKind,
}

impl Recommendation {
    /// Advice text with the domain capitalized
    #[must_use]
    pub fn message(&self) -> String {
        let domain = capitalize(&self.domain);
        match self.kind {
            RecommendationKind::AddressNegative => format!(
                "{domain}: Address negative feedback (e.g., improve reliability or clarity) to enhance user satisfaction."
            ),
            RecommendationKind::LeveragePositive => format!(
                "{domain}: Leverage strong positive feedback (e.g., expand successful features) to attract more users."
            ),
            RecommendationKind::BalanceMixed => format!(
                "{domain}: Balance neutral or mixed feedback by enhancing standout features and addressing minor issues."
            ),
        }
    }
}

/// One recommendation per domain, comparing negative and positive counts
pub fn recommendations(view: &FilteredView<'_>) -> Result<Vec<Recommendation>> {
    Ok(domain_breakdown(view)?
        .into_iter()
        .map(|entry| {
            let kind = match entry.counts.negative.cmp(&entry.counts.positive) {
                std::cmp::Ordering::Greater => RecommendationKind::AddressNegative,
                std::cmp::Ordering::Less => RecommendationKind::LeveragePositive,
                std::cmp::Ordering::Equal => RecommendationKind::BalanceMixed,
            };
            Recommendation {
                domain: entry.domain,
                kind,
            }
        })
        .collect())
}

/// Uppercase the first character, lowercase the rest
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Wrap every case-insensitive occurrence of `keyword` in `**`, keeping the text's casing
#[must_use]
pub fn highlight_keyword(text: &str, keyword: &str) -> String {
    if keyword.trim().is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern
            .replace_all(text, |caps: &regex::Captures<'_>| format!("**{}**", &caps[0]))
            .into_owned(),
        // An escaped literal only fails on size limits; show the text unhighlighted
        Err(_) => text.to_string(),
    }
}
