//! Prometheus counters for stock evaluation passes.
//!
//! Collectors live in a dedicated [`Registry`] so embedding applications can
//! expose them next to their own metrics via [`gather_text`].

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::time::Duration;

pub static METRICS: Lazy<LabstockMetrics> = Lazy::new(LabstockMetrics::init);

pub struct LabstockMetrics {
    pub registry: Registry,
    pub evaluations_total: IntCounter,
    pub records_evaluated_total: IntCounter,
    pub malformed_records_total: IntCounter,
    pub evaluation_duration: Histogram,
}

impl LabstockMetrics {
    pub fn init() -> Self {
        let registry = Registry::new();

        let evaluations_total = IntCounter::new(
            "labstock_evaluations_total",
            "Completed stock status evaluation passes",
        )
        .expect("valid counter definition");

        let records_evaluated_total = IntCounter::new(
            "labstock_records_evaluated_total",
            "Records annotated by stock status evaluation",
        )
        .expect("valid counter definition");

        let malformed_records_total = IntCounter::new(
            "labstock_malformed_records_total",
            "Evaluation passes rejected because of a malformed record",
        )
        .expect("valid counter definition");

        let evaluation_duration = Histogram::with_opts(HistogramOpts::new(
            "labstock_evaluation_duration_seconds",
            "Duration of stock status evaluation passes",
        ))
        .expect("valid histogram definition");

        for collector in [
            Box::new(evaluations_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(records_evaluated_total.clone()),
            Box::new(malformed_records_total.clone()),
            Box::new(evaluation_duration.clone()),
        ] {
            registry
                .register(collector)
                .expect("collector names are unique");
        }

        Self {
            registry,
            evaluations_total,
            records_evaluated_total,
            malformed_records_total,
            evaluation_duration,
        }
    }

    pub fn record_evaluation(&self, records: usize, elapsed: Duration) {
        self.evaluations_total.inc();
        self.records_evaluated_total.inc_by(records as u64);
        self.evaluation_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_malformed(&self) {
        self.malformed_records_total.inc();
    }
}

/// Render all labstock collectors in the Prometheus text format.
///
/// # Errors
///
/// Returns the encoder error if a metric family cannot be rendered.
pub fn gather_text() -> Result<String, prometheus::Error> {
    TextEncoder::new().encode_to_string(&METRICS.registry.gather())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_evaluation_updates_counters() {
        let before_passes = METRICS.evaluations_total.get();
        let before_records = METRICS.records_evaluated_total.get();

        let records: Vec<RawRecord> = serde_json::from_value(json!([
            { "id": 1, "name": "a", "quantity": 1 },
            { "id": 2, "name": "b", "quantity": 2 }
        ]))
        .unwrap();
        crate::status::evaluate(&records, Utc::now()).unwrap();

        // Other tests evaluate concurrently, so only lower bounds hold.
        assert!(METRICS.evaluations_total.get() > before_passes);
        assert!(METRICS.records_evaluated_total.get() >= before_records + 2);
    }

    #[test]
    fn test_malformed_record_is_counted() {
        let before = METRICS.malformed_records_total.get();
        let records: Vec<RawRecord> =
            serde_json::from_value(json!([{ "id": 1, "name": "a", "quantity": "one" }])).unwrap();
        assert!(crate::status::evaluate(&records, Utc::now()).is_err());
        assert!(METRICS.malformed_records_total.get() > before);
    }

    #[test]
    fn test_gather_text_lists_collectors() {
        METRICS.record_malformed();
        let text = gather_text().unwrap();
        assert!(text.contains("labstock_evaluations_total"));
        assert!(text.contains("labstock_malformed_records_total"));
    }
}
