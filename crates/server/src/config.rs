//! Server configuration

use advisor_lib::audit::{AuditSink, BlobAuditSink, FileAuditSink};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Server configuration, read from `advisor.toml` and `ADVISOR_*` env vars
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// HTTP port for the API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Local JSON-lines audit log
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: String,

    /// Remote audit blob URL; takes precedence over the local log
    #[serde(default)]
    pub audit_blob_url: Option<String>,

    /// Accept sizes outside the hardware catalog
    #[serde(default)]
    pub allow_custom_sizes: bool,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "pg-advisor".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_audit_log_path() -> String {
    "audit/recommendations.jsonl".to_string()
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            audit_log_path: default_audit_log_path(),
            audit_blob_url: None,
            allow_custom_sizes: false,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from an optional config file and the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("advisor").required(false))
            .add_source(config::Environment::with_prefix("ADVISOR").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid advisor configuration")
    }

    /// Build the configured audit sink
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>> {
        match self.audit_blob_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => {
                let sink = BlobAuditSink::new(url).context("Invalid ADVISOR_AUDIT_BLOB_URL")?;
                Ok(Arc::new(sink))
            }
            None => Ok(Arc::new(FileAuditSink::new(&self.audit_log_path))),
        }
    }
}
