//! Audit trail of recommendation requests
//!
//! This module provides:
//! - The [`AuditEntry`] record built by callers after a successful computation
//! - The [`AuditSink`] trait with local file, remote blob and in-memory sinks
//! - Best-effort recording that turns sink failures into warnings

mod blob;
mod file;
mod memory;

pub use blob::BlobAuditSink;
pub use file::FileAuditSink;
pub use memory::MemoryAuditSink;

pub use async_trait::async_trait;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::AuditError;
use crate::models::{Recommendation, Requester, SizingInput, WorkloadRole};
use crate::observability::AdvisorMetrics;

/// One recorded recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub requester: Requester,
    pub sizing: SizingInput,
    pub role: WorkloadRole,
    pub recommendation: Recommendation,
}

impl AuditEntry {
    pub fn new(
        requester: Requester,
        sizing: SizingInput,
        role: WorkloadRole,
        recommendation: Recommendation,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            requester,
            sizing,
            role,
            recommendation,
        }
    }

    /// Serialize as a single JSON line including the trailing newline
    pub fn to_json_line(&self) -> Result<String, AuditError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Destination for audit entries
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Durably append an entry
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError>;

    /// Short description used in logs and health output
    fn name(&self) -> &str;
}

/// Non-fatal notice that an entry could not be recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    pub sink: String,
    pub message: String,
}

impl std::fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "audit entry not recorded by {}: {}", self.sink, self.message)
    }
}

/// Record an entry without ever failing the caller
///
/// Returns a warning for the caller to surface when the sink rejects the
/// entry. The recommendation itself is unaffected.
pub async fn record_best_effort(sink: &dyn AuditSink, entry: &AuditEntry) -> Option<AuditWarning> {
    let metrics = AdvisorMetrics::new();
    let start = Instant::now();
    let result = sink.record(entry).await;
    metrics.observe_audit_latency(start.elapsed().as_secs_f64());

    match result {
        Ok(()) => {
            debug!(sink = %sink.name(), role = %entry.role, "Audit entry recorded");
            None
        }
        Err(e) => {
            metrics.inc_audit_failures();
            warn!(
                event = "audit_failed",
                sink = %sink.name(),
                requester = %entry.requester.display_name(),
                error = %e,
                "Failed to record audit entry"
            );
            Some(AuditWarning {
                sink: sink.name().to_string(),
                message: e.to_string(),
            })
        }
    }
}
