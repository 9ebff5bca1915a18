//! Stage 1: base values derived from hardware sizing only

use crate::models::SizingInput;

/// Fraction of memory given to shared_buffers before scaling
pub const SHARED_BUFFERS_FRACTION: f64 = 0.25;

/// Fraction of memory reported as effective_cache_size
pub const EFFECTIVE_CACHE_FRACTION: f64 = 0.75;

pub const RANDOM_PAGE_COST_BASE: f64 = 1.0;
pub const DEFAULT_STATISTICS_TARGET_BASE: u32 = 100;
pub const GEQO_THRESHOLD_BASE: u32 = 12;
pub const COLLAPSE_LIMIT_BASE: u32 = 8;

/// Role- and profile-independent starting values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseValues {
    /// MB, unscaled
    pub shared_buffers_mb: f64,
    /// MB, never scaled
    pub effective_cache_size_mb: f64,
    pub random_page_cost: f64,
    pub default_statistics_target: u32,
    // Planner starting points. Not emitted: stage 3 takes geqo_threshold from
    // the role table and derives both collapse limits from it.
    pub geqo_threshold: u32,
    pub from_collapse_limit: u32,
    pub join_collapse_limit: u32,
    /// Worker values below are emitted as-is on servers with 8 CPUs or fewer
    pub max_parallel_workers: u32,
    pub max_worker_processes: u32,
    pub max_parallel_workers_per_gather: u32,
    pub max_parallel_maintenance_workers: u32,
}

impl BaseValues {
    pub fn from_sizing(sizing: &SizingInput) -> Self {
        let memory_mb = sizing.memory_mb() as f64;
        let cpus = sizing.cpu_count;

        let process_workers = if cpus <= 16 { 8 } else { cpus / 2 };
        let gather_workers = if cpus <= 8 { 2 } else { cpus / 4 };

        Self {
            shared_buffers_mb: memory_mb * SHARED_BUFFERS_FRACTION,
            effective_cache_size_mb: memory_mb * EFFECTIVE_CACHE_FRACTION,
            random_page_cost: RANDOM_PAGE_COST_BASE,
            default_statistics_target: DEFAULT_STATISTICS_TARGET_BASE,
            geqo_threshold: GEQO_THRESHOLD_BASE,
            from_collapse_limit: COLLAPSE_LIMIT_BASE,
            join_collapse_limit: COLLAPSE_LIMIT_BASE,
            max_parallel_workers: process_workers,
            max_worker_processes: process_workers,
            max_parallel_workers_per_gather: gather_workers,
            max_parallel_maintenance_workers: gather_workers,
        }
    }
}
