//! Filtering the working table into views
//!
//! Filters never touch the dataset; a view is a list of borrowed records in
//! dataset order.

use std::collections::BTreeSet;

use crate::metrics::MetricsCollector;
use crate::models::{normalize_category, CommentRecord, Dataset, SentimentLabel};

/// Distinct values available to each multi-select, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Labels present in the dataset
    pub sentiments: Vec<SentimentLabel>,
    /// Domains present in the dataset
    pub domains: Vec<String>,
}

impl FilterOptions {
    /// Collect option sets from a dataset
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut options = Self::default();
        for record in dataset.records() {
            if !options.sentiments.contains(&record.sentiment_label) {
                options.sentiments.push(record.sentiment_label);
            }
            if !options.domains.contains(&record.domain) {
                options.domains.push(record.domain.clone());
            }
        }
        options
    }
}

/// Current filter selection
///
/// `None` on a dimension selects everything; `Some` of an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Labels to keep
    pub sentiments: Option<BTreeSet<SentimentLabel>>,
    /// Domains to keep, normalized
    pub domains: Option<BTreeSet<String>>,
    /// Case-insensitive substring that `comment` must contain
    pub keyword: Option<String>,
}

impl FilterSpec {
    /// Select everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to the given labels
    #[must_use]
    pub fn with_sentiments<I: IntoIterator<Item = SentimentLabel>>(mut self, labels: I) -> Self {
        self.sentiments = Some(labels.into_iter().collect());
        self
    }

    /// Restrict to the given domains; values are normalized like the dataset
    #[must_use]
    pub fn with_domains<I, D>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        self.domains = Some(
            domains
                .into_iter()
                .map(|d| normalize_category(d.as_ref()))
                .collect(),
        );
        self
    }

    /// Require a keyword; blank keywords disable the keyword filter
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = if keyword.trim().is_empty() {
            None
        } else {
            Some(keyword)
        };
        self
    }

    /// The keyword, if one is active
    #[must_use]
    pub fn active_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Whether a single record passes every dimension
    #[must_use]
    pub fn matches(&self, record: &CommentRecord) -> bool {
        self.sentiments
            .as_ref()
            .map_or(true, |set| set.contains(&record.sentiment_label))
            && self
                .domains
                .as_ref()
                .map_or(true, |set| set.contains(&record.domain))
            && self
                .active_keyword()
                .map_or(true, |keyword| contains_ignore_case(&record.comment, keyword))
    }

    /// Apply to a whole dataset
    #[must_use]
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        let view = self.apply_records(dataset.records().iter());
        MetricsCollector::default().record_filtered_rows(view.len());
        view
    }

    /// Apply to any sequence of records, e.g. another view
    #[must_use]
    pub fn apply_records<'a, I>(&self, records: I) -> FilteredView<'a>
    where
        I: IntoIterator<Item = &'a CommentRecord>,
    {
        FilteredView {
            records: records.into_iter().filter(|r| self.matches(r)).collect(),
        }
    }
}

/// Case-insensitive substring test
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Records that passed the current filters
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a CommentRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of a dataset
    #[must_use]
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.records().iter().collect(),
        }
    }

    /// Records in dataset order
    #[must_use]
    pub fn records(&self) -> &[&'a CommentRecord] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> impl Iterator<Item = &'a CommentRecord> + '_ {
        self.records.iter().copied()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the filters removed everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records carrying `label`
    pub fn with_label(&self, label: SentimentLabel) -> impl Iterator<Item = &'a CommentRecord> + '_ {
        self.iter().filter(move |r| r.sentiment_label == label)
    }

    /// Whether any record carries a `comment_id`
    #[must_use]
    pub fn has_comment_ids(&self) -> bool {
        self.iter().any(|r| r.comment_id.is_some())
    }
}
