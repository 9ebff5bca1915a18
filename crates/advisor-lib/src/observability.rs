//! Observability for the advisor
//!
//! Provides:
//! - Prometheus metrics (recommendations by role, rejections, audit failures, latency)
//! - Structured logging of request outcomes with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::AdvisorError;
use crate::models::{Requester, SizingInput, WorkloadRole};

/// Latency buckets in seconds; engine calls are sub-millisecond, audit writes may hit the network
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
];

static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

struct AdvisorMetricsInner {
    recommendations: IntCounterVec,
    rejections: IntCounterVec,
    audit_failures: IntCounter,
    recommendation_latency_seconds: Histogram,
    audit_latency_seconds: Histogram,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            recommendations: register_int_counter_vec!(
                "pg_advisor_recommendations_total",
                "Recommendations computed, by workload role",
                &["role"]
            )
            .expect("Failed to register recommendations_total"),

            rejections: register_int_counter_vec!(
                "pg_advisor_rejections_total",
                "Requests rejected by validation, by error code",
                &["code"]
            )
            .expect("Failed to register rejections_total"),

            audit_failures: register_int_counter!(
                "pg_advisor_audit_failures_total",
                "Audit entries that could not be recorded"
            )
            .expect("Failed to register audit_failures_total"),

            recommendation_latency_seconds: register_histogram!(
                "pg_advisor_recommendation_latency_seconds",
                "Time spent computing a recommendation",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register recommendation_latency_seconds"),

            audit_latency_seconds: register_histogram!(
                "pg_advisor_audit_latency_seconds",
                "Time spent writing an audit entry",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register audit_latency_seconds"),
        }
    }
}

/// Handle to the process-wide metrics; clones share the same counters
#[derive(Clone)]
pub struct AdvisorMetrics {
    _private: (),
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AdvisorMetricsInner {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new)
    }

    pub fn inc_recommendations(&self, role: WorkloadRole) {
        self.inner()
            .recommendations
            .with_label_values(&[role.as_str()])
            .inc();
    }

    pub fn recommendations(&self, role: WorkloadRole) -> u64 {
        self.inner()
            .recommendations
            .with_label_values(&[role.as_str()])
            .get()
    }

    pub fn inc_rejections(&self, error: &AdvisorError) {
        self.inner()
            .rejections
            .with_label_values(&[error.code()])
            .inc();
    }

    pub fn inc_audit_failures(&self) {
        self.inner().audit_failures.inc();
    }

    pub fn audit_failures(&self) -> u64 {
        self.inner().audit_failures.get()
    }

    pub fn observe_recommendation_latency(&self, duration_secs: f64) {
        self.inner()
            .recommendation_latency_seconds
            .observe(duration_secs);
    }

    pub fn observe_audit_latency(&self, duration_secs: f64) {
        self.inner().audit_latency_seconds.observe(duration_secs);
    }
}

/// Consistent structured events for request outcomes
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn log_recommendation(&self, sizing: &SizingInput, role: WorkloadRole, requester: &Requester) {
        info!(
            event = "recommendation_generated",
            instance = %self.instance,
            cpu_count = sizing.cpu_count,
            memory_gb = sizing.memory_gb,
            role = %role,
            requester = %requester.display_name(),
            "Generated parameter recommendation"
        );
    }

    pub fn log_rejection(&self, role: Option<WorkloadRole>, error: &AdvisorError) {
        info!(
            event = "recommendation_rejected",
            instance = %self.instance,
            role = ?role.map(|r| r.as_str()),
            code = %error.code(),
            error = %error,
            "Rejected recommendation request"
        );
    }

    pub fn log_audit_warning(&self, sink: &str, message: &str) {
        warn!(
            event = "audit_degraded",
            instance = %self.instance,
            sink = %sink,
            message = %message,
            "Recommendation returned without audit record"
        );
    }

    pub fn log_startup(&self, version: &str, audit_sink: &str) {
        info!(
            event = "advisor_started",
            instance = %self.instance,
            version = %version,
            audit_sink = %audit_sink,
            "Parameter advisor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "advisor_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Parameter advisor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_counters() {
        let a = AdvisorMetrics::new();
        let b = a.clone();

        let before = b.recommendations(WorkloadRole::Rag);
        a.inc_recommendations(WorkloadRole::Rag);
        assert!(b.recommendations(WorkloadRole::Rag) > before);

        a.inc_rejections(&AdvisorError::InvalidInput("x".into()));
        a.observe_recommendation_latency(0.0001);
        a.observe_audit_latency(0.01);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("advisor-test");
        assert_eq!(logger.instance(), "advisor-test");
    }
}
