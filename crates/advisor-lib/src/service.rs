//! Request pipeline shared by the HTTP service and the CLI
//!
//! Validates against the catalog, runs the engine, records metrics and
//! hands the result to the audit sink. Only validation can fail a request.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::audit::{record_best_effort, AuditEntry, AuditSink, AuditWarning};
use crate::catalog;
use crate::engine;
use crate::error::AdvisorError;
use crate::models::{Recommendation, Requester, SizingInput, WorkloadRole};
use crate::observability::{AdvisorMetrics, StructuredLogger};

/// Result of a successful request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub sizing: SizingInput,
    pub role: WorkloadRole,
    pub recommendation: Recommendation,
    /// Non-fatal problems, currently only audit failures
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

pub struct Advisor {
    audit_sink: Option<Arc<dyn AuditSink>>,
    metrics: AdvisorMetrics,
    logger: StructuredLogger,
    enforce_catalog: bool,
}

impl Advisor {
    pub fn new(logger: StructuredLogger) -> Self {
        Self {
            audit_sink: None,
            metrics: AdvisorMetrics::new(),
            logger,
            enforce_catalog: true,
        }
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Accept any positive sizing instead of only catalog sizes
    pub fn allow_custom_sizes(mut self) -> Self {
        self.enforce_catalog = false;
        self
    }

    pub fn audit_sink(&self) -> Option<&Arc<dyn AuditSink>> {
        self.audit_sink.as_ref()
    }

    pub async fn advise(
        &self,
        sizing: SizingInput,
        role: WorkloadRole,
        requester: Requester,
    ) -> Result<Advice, AdvisorError> {
        let start = Instant::now();
        let result = self.evaluate(sizing, role);
        self.metrics
            .observe_recommendation_latency(start.elapsed().as_secs_f64());

        let recommendation = match result {
            Ok(r) => r,
            Err(e) => {
                self.metrics.inc_rejections(&e);
                self.logger.log_rejection(Some(role), &e);
                return Err(e);
            }
        };

        self.metrics.inc_recommendations(role);
        self.logger.log_recommendation(&sizing, role, &requester);

        let mut warnings = Vec::new();
        if let Some(sink) = &self.audit_sink {
            let entry = AuditEntry::new(requester, sizing, role, recommendation.clone());
            if let Some(warning) = record_best_effort(sink.as_ref(), &entry).await {
                self.logger.log_audit_warning(&warning.sink, &warning.message);
                warnings.push(warning);
            }
        }

        Ok(Advice {
            sizing,
            role,
            recommendation,
            warnings,
        })
    }

    fn evaluate(
        &self,
        sizing: SizingInput,
        role: WorkloadRole,
    ) -> Result<Recommendation, AdvisorError> {
        if self.enforce_catalog {
            catalog::validate_sizing(&sizing, role)?;
        }
        engine::recommend(sizing, role)
    }
}
