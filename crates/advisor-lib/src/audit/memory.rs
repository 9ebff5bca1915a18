//! In-process audit sink

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{async_trait, AuditEntry, AuditSink};
use crate::error::AuditError;

/// Keeps entries in memory; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
