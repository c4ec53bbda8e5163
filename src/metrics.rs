use anyhow::Result;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
///
/// Metric names are fixed; the facade routes them to whatever recorder is installed.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Loading metrics
    pub datasets_loaded_total: &'static str,
    pub rows_loaded_total: &'static str,
    pub rows_dropped_total: &'static str,

    // Classification metrics
    pub records_classified_total: &'static str,
    pub labels_derived_total: &'static str,
    pub polarity_scores: &'static str,

    // View metrics
    pub filtered_rows: &'static str,

    // Export metrics
    pub reports_exported_total: &'static str,
    pub report_rows_total: &'static str,

    // Timing and error metrics
    pub operation_duration: &'static str,
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            datasets_loaded_total: "feedback_datasets_loaded_total",
            rows_loaded_total: "feedback_rows_loaded_total",
            rows_dropped_total: "feedback_rows_dropped_total",

            records_classified_total: "feedback_records_classified_total",
            labels_derived_total: "feedback_labels_derived_total",
            polarity_scores: "feedback_polarity_scores",

            filtered_rows: "feedback_filtered_rows",

            reports_exported_total: "feedback_reports_exported_total",
            report_rows_total: "feedback_report_rows_total",

            operation_duration: "feedback_operation_duration_seconds",
            errors_total: "feedback_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Install a no-op recorder so the facade has a sink
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|e| anyhow::anyhow!("Failed to initialize metrics recorder: {}", e))?;

        Ok(())
    }

    /// Record a completed load event
    pub fn record_load(&self, source: &str, rows: usize, dropped: usize) {
        counter!(self.datasets_loaded_total, "source" => source.to_owned()).increment(1);
        counter!(self.rows_loaded_total, "source" => source.to_owned()).increment(rows as u64);
        counter!(self.rows_dropped_total, "source" => source.to_owned()).increment(dropped as u64);
    }

    /// Record a classification pass
    pub fn record_classification(&self, total: usize, derived: usize) {
        counter!(self.records_classified_total).increment(total as u64);
        counter!(self.labels_derived_total).increment(derived as u64);
    }

    /// Record one polarity score
    pub fn record_polarity(&self, score: f64) {
        histogram!(self.polarity_scores).record(score);
    }

    /// Record the size of the current filtered view
    pub fn record_filtered_rows(&self, rows: usize) {
        gauge!(self.filtered_rows).set(rows as f64);
    }

    /// Record a report export
    pub fn record_export(&self, format: &str, rows: usize) {
        counter!(self.reports_exported_total, "format" => format.to_owned()).increment(1);
        counter!(self.report_rows_total, "format" => format.to_owned()).increment(rows as u64);
    }

    /// Record how long an operation took
    pub fn record_duration(&self, operation: &str, duration: Duration) {
        histogram!(self.operation_duration, "operation" => operation.to_owned())
            .record(duration.as_secs_f64());
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &str) {
        counter!(
            self.errors_total,
            "type" => error_type,
            "operation" => operation.to_owned()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.datasets_loaded_total, "feedback_datasets_loaded_total");
        assert_eq!(collector.polarity_scores, "feedback_polarity_scores");
    }

    #[test]
    fn test_recording_without_recorder_is_harmless() {
        let collector = MetricsCollector::default();
        collector.record_load("default", 10, 2);
        collector.record_classification(10, 3);
        collector.record_polarity(0.42);
        collector.record_error("io", "load");
    }
}
