//! Observability infrastructure for the prediction pipeline
//!
//! Provides:
//! - Prometheus metrics (model loading, prediction latency, error counts)
//! - Structured logging of pipeline events with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Encoder, Histogram, IntCounter,
    IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    models_loaded: IntGauge,
    model_load_failures: IntCounter,
    prediction_latency_seconds: Histogram,
    predictions: IntCounter,
    prediction_errors: IntCounter,
    submissions_rejected: IntCounter,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            models_loaded: register_int_gauge!(
                "cardio_models_loaded",
                "Number of models currently held by the registry"
            )
            .expect("Failed to register models_loaded"),

            model_load_failures: register_int_counter!(
                "cardio_model_load_failures_total",
                "Total number of models that failed to load"
            )
            .expect("Failed to register model_load_failures"),

            prediction_latency_seconds: register_histogram!(
                "cardio_prediction_latency_seconds",
                "Time spent in a single model's predict call",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions: register_int_counter!(
                "cardio_predictions_total",
                "Total number of successful model predictions"
            )
            .expect("Failed to register predictions"),

            prediction_errors: register_int_counter!(
                "cardio_prediction_errors_total",
                "Total number of failed model predictions"
            )
            .expect("Failed to register prediction_errors"),

            submissions_rejected: register_int_counter!(
                "cardio_submissions_rejected_total",
                "Submissions rejected before any model ran"
            )
            .expect("Failed to register submissions_rejected"),
        }
    }
}

/// Handle to the process-wide Prometheus metrics
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    pub fn set_models_loaded(&self, count: i64) {
        self.inner().models_loaded.set(count);
    }

    pub fn inc_model_load_failures(&self) {
        self.inner().model_load_failures.inc();
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn inc_submissions_rejected(&self) {
        self.inner().submissions_rejected.inc();
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for pipeline events
#[derive(Clone)]
pub struct StructuredLogger {
    schema_version: String,
}

impl StructuredLogger {
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
        }
    }

    /// Log process startup
    pub fn log_startup(&self, version: &str, models_dir: &str) {
        info!(
            event = "started",
            schema_version = %self.schema_version,
            app_version = %version,
            models_dir = %models_dir,
            "Cardio predict started"
        );
    }

    /// Log the outcome of registry loading
    pub fn log_registry_loaded(&self, loaded: usize, failed: usize, status: &str) {
        if failed > 0 {
            warn!(
                event = "registry_loaded",
                schema_version = %self.schema_version,
                loaded = loaded,
                failed = failed,
                status = %status,
                "Model registry loaded with failures"
            );
        } else {
            info!(
                event = "registry_loaded",
                schema_version = %self.schema_version,
                loaded = loaded,
                status = %status,
                "Model registry loaded"
            );
        }
    }

    /// Log a single model prediction
    pub fn log_prediction(&self, identifier: &str, label: &str, elapsed_us: u128) {
        info!(
            event = "prediction_generated",
            schema_version = %self.schema_version,
            identifier = %identifier,
            label = %label,
            elapsed_us = elapsed_us,
            "Generated prediction"
        );
    }

    /// Log a model failing on a vector
    pub fn log_prediction_failed(&self, identifier: &str, message: &str) {
        warn!(
            event = "prediction_failed",
            schema_version = %self.schema_version,
            identifier = %identifier,
            error = %message,
            "Model failed to predict"
        );
    }

    /// Log a submission rejected before prediction
    pub fn log_submission_rejected(&self, reason: &str) {
        warn!(
            event = "submission_rejected",
            schema_version = %self.schema_version,
            reason = %reason,
            "Submission rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Metrics are process-wide and tests run in parallel, so counters are
    // checked as lower bounds.
    #[test]
    fn test_metrics_initialization() {
        let metrics = ServiceMetrics::new();
        let inner = metrics.inner();
        let failures = inner.model_load_failures.get();
        let samples = inner.prediction_latency_seconds.get_sample_count();
        let errors = inner.prediction_errors.get();
        let rejected = inner.submissions_rejected.get();

        metrics.inc_model_load_failures();
        metrics.observe_prediction_latency(0.002);
        metrics.inc_prediction_errors();
        metrics.inc_submissions_rejected();

        assert!(inner.model_load_failures.get() > failures);
        assert!(inner.prediction_latency_seconds.get_sample_count() > samples);
        assert!(inner.prediction_errors.get() > errors);
        assert!(inner.submissions_rejected.get() > rejected);
    }

    #[test]
    fn test_metrics_clone_shares_state() {
        let metrics1 = ServiceMetrics::new();
        let metrics2 = metrics1.clone();
        let before = metrics2.inner().predictions.get();

        metrics1.inc_predictions();
        metrics1.inc_predictions();

        assert!(metrics2.inner().predictions.get() >= before + 2);
        assert!(std::ptr::eq(metrics1.inner(), ServiceMetrics::new().inner()));
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = ServiceMetrics::new();
        metrics.inc_predictions();
        let text = metrics.render();
        assert!(text.contains("cardio_predictions_total"));
        assert!(text.contains("cardio_models_loaded"));
    }

    #[test]
    fn test_structured_logger_events() {
        let logger = StructuredLogger::new("heart-disease/v1");
        logger.log_startup("0.1.0", "models");
        logger.log_registry_loaded(9, 1, "degraded");
        logger.log_prediction("random_forest", "Presence", 120);
        logger.log_prediction_failed("svm", "shape mismatch");
        logger.log_submission_rejected("no value supplied for feature 'Sex'");
    }
}
