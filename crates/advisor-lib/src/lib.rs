//! PostgreSQL parameter advisor library
//!
//! This crate provides:
//! - The recommendation engine mapping hardware sizing and workload role to
//!   conservative, balanced and aggressive settings
//! - The supported hardware catalog
//! - Audit sinks (local JSON lines, remote blob, in-memory)
//! - CSV export
//! - The request pipeline shared by the server and the CLI
//! - Health checks and observability

pub mod audit;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod export;
pub mod health;
pub mod models;
pub mod observability;
pub mod service;

pub use audit::{record_best_effort, AuditEntry, AuditSink, AuditWarning};
pub use catalog::Catalog;
pub use engine::recommend;
pub use error::{AdvisorError, AuditError, ExportError};
pub use export::{catalog_to_csv, to_csv, ProfileSelection, DEFAULT_CSV_FILENAME};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use service::{Advice, Advisor};
