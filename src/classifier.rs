//! Sentiment classification and label reconciliation
//!
//! Every record gets a polarity score. A label supplied by the source is kept
//! as-is even when the score disagrees; only records without a label get one
//! derived from the score.

use tracing::debug;

use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{CommentRecord, PendingRecord, SentimentLabel};
use crate::sentiment::PolarityScorer;

/// Scores above this are positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores below this are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Map a compound score onto a label; both thresholds are exclusive
#[must_use]
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Applies a scorer to loaded records
pub struct SentimentClassifier<S> {
    scorer: S,
    metrics: MetricsCollector,
}

impl<S: PolarityScorer> SentimentClassifier<S> {
    /// Classifier over the given scorer
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            metrics: MetricsCollector::default(),
        }
    }

    /// The underlying scorer
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score and, where needed, label a single record
    pub fn classify_record(&self, record: PendingRecord) -> CommentRecord {
        let polarity_score = self.scorer.polarity(&record.comment);
        let sentiment_label = record
            .sentiment_label
            .unwrap_or_else(|| label_for_score(polarity_score));

        CommentRecord {
            comment_id: record.comment_id,
            comment: record.comment,
            domain: record.domain,
            sentiment_label,
            polarity_score,
        }
    }

    /// Classify a whole table, preserving row order
    pub fn classify(&self, records: Vec<PendingRecord>) -> Vec<CommentRecord> {
        let timer = OperationTimer::new("classify");
        let total = records.len();
        let derived = records.iter().filter(|r| r.sentiment_label.is_none()).count();

        let classified: Vec<CommentRecord> = records
            .into_iter()
            .map(|record| self.classify_record(record))
            .collect();

        for record in &classified {
            self.metrics.record_polarity(record.polarity_score);
        }
        self.metrics.record_classification(total, derived);
        debug!(
            records = total,
            derived_labels = derived,
            supplied_labels = total - derived,
            "Classified records"
        );
        timer.finish();

        classified
    }
}
