//! The fixed table of parameters the engine knows how to recommend

use super::base::BaseValues;
use super::format::{RawValue, Unit};
use super::rules::RoleFactorTable;
use crate::models::{ApplyType, Profile, SizingInput};

pub const SHARED_BUFFERS: &str = "shared_buffers";
pub const EFFECTIVE_CACHE_SIZE: &str = "effective_cache_size";
pub const WORK_MEM: &str = "work_mem";
pub const MAINTENANCE_WORK_MEM: &str = "maintenance_work_mem";
pub const RANDOM_PAGE_COST: &str = "random_page_cost";
pub const DEFAULT_STATISTICS_TARGET: &str = "default_statistics_target";
pub const GEQO_THRESHOLD: &str = "geqo_threshold";
pub const FROM_COLLAPSE_LIMIT: &str = "from_collapse_limit";
pub const JOIN_COLLAPSE_LIMIT: &str = "join_collapse_limit";
pub const MAX_WORKER_PROCESSES: &str = "max_worker_processes";
pub const MAX_PARALLEL_WORKERS: &str = "max_parallel_workers";
pub const MAX_PARALLEL_WORKERS_PER_GATHER: &str = "max_parallel_workers_per_gather";
pub const MAX_PARALLEL_MAINTENANCE_WORKERS: &str = "max_parallel_maintenance_workers";
pub const AUTOVACUUM: &str = "autovacuum";

/// Collapse limits follow the geqo threshold at this ratio
const COLLAPSE_LIMIT_RATIO: f64 = 0.75;

/// At or below this CPU count the worker settings ignore the profile
const SMALL_CPU_BAND: u32 = 8;

/// Everything a parameter needs to compute its value for one profile
#[derive(Debug, Clone, Copy)]
pub struct ScalingContext<'a> {
    pub sizing: &'a SizingInput,
    pub base: &'a BaseValues,
    pub factors: &'a RoleFactorTable,
    pub profile: Profile,
}

/// Engine-owned description of one parameter
#[derive(Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub unit: Unit,
    pub apply_type: ApplyType,
    /// False for values shown for reference only
    pub tunable: bool,
    pub compute: fn(&ScalingContext<'_>) -> RawValue,
}

pub const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: SHARED_BUFFERS,
        unit: Unit::Megabytes,
        apply_type: ApplyType::Static,
        tunable: true,
        compute: shared_buffers,
    },
    ParameterSpec {
        name: EFFECTIVE_CACHE_SIZE,
        unit: Unit::Megabytes,
        apply_type: ApplyType::Dynamic,
        tunable: false,
        compute: effective_cache_size,
    },
    ParameterSpec {
        name: WORK_MEM,
        unit: Unit::Kilobytes,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: work_mem,
    },
    ParameterSpec {
        name: MAINTENANCE_WORK_MEM,
        unit: Unit::Megabytes,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: maintenance_work_mem,
    },
    ParameterSpec {
        name: RANDOM_PAGE_COST,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: random_page_cost,
    },
    ParameterSpec {
        name: DEFAULT_STATISTICS_TARGET,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: default_statistics_target,
    },
    ParameterSpec {
        name: GEQO_THRESHOLD,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: geqo_threshold,
    },
    ParameterSpec {
        name: FROM_COLLAPSE_LIMIT,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: collapse_limit,
    },
    ParameterSpec {
        name: JOIN_COLLAPSE_LIMIT,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: collapse_limit,
    },
    ParameterSpec {
        name: MAX_WORKER_PROCESSES,
        unit: Unit::Unitless,
        apply_type: ApplyType::Static,
        tunable: true,
        compute: max_worker_processes,
    },
    ParameterSpec {
        name: MAX_PARALLEL_WORKERS,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: max_parallel_workers,
    },
    ParameterSpec {
        name: MAX_PARALLEL_WORKERS_PER_GATHER,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: max_parallel_workers_per_gather,
    },
    // Same expression as per-gather workers once CPUs exceed the small band.
    ParameterSpec {
        name: MAX_PARALLEL_MAINTENANCE_WORKERS,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: max_parallel_maintenance_workers,
    },
    ParameterSpec {
        name: AUTOVACUUM,
        unit: Unit::Unitless,
        apply_type: ApplyType::Dynamic,
        tunable: true,
        compute: autovacuum,
    },
];

/// Look up a parameter by name
pub fn parameter(name: &str) -> Option<&'static ParameterSpec> {
    PARAMETERS.iter().find(|p| p.name == name)
}

/// Restart requirement of a known parameter
pub fn classify(name: &str) -> Option<ApplyType> {
    parameter(name).map(|p| p.apply_type)
}

fn shared_buffers(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Megabytes(ctx.base.shared_buffers_mb * ctx.factors.shared_buffers.get(ctx.profile))
}

fn effective_cache_size(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Megabytes(ctx.base.effective_cache_size_mb)
}

fn work_mem(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Kilobytes(u64::from(ctx.factors.work_mem_mb.get(ctx.profile)) * 1024)
}

fn maintenance_work_mem(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Megabytes(f64::from(ctx.factors.maintenance_work_mem_mb.get(ctx.profile)))
}

fn random_page_cost(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Decimal(ctx.base.random_page_cost * ctx.factors.random_page_cost.get(ctx.profile))
}

fn default_statistics_target(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(ctx.base.default_statistics_target * ctx.factors.statistics_target.get(ctx.profile))
}

fn geqo_threshold(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(ctx.factors.geqo_threshold(ctx.profile, ctx.sizing.cpu_count))
}

fn collapse_limit(ctx: &ScalingContext<'_>) -> RawValue {
    let geqo = ctx.factors.geqo_threshold(ctx.profile, ctx.sizing.cpu_count);
    RawValue::Count((f64::from(geqo) * COLLAPSE_LIMIT_RATIO).round_ties_even() as u32)
}

/// Worker ceiling for large servers; the stage-1 value is kept on small ones
fn worker_ceiling(ctx: &ScalingContext<'_>, small_cpu_value: u32) -> u32 {
    if ctx.sizing.cpu_count <= SMALL_CPU_BAND {
        small_cpu_value
    } else {
        ctx.sizing.cpu_count
    }
}

/// Gather tier capped by the parallel worker ceiling
fn gather_tier(ctx: &ScalingContext<'_>, small_cpu_value: u32) -> u32 {
    if ctx.sizing.cpu_count <= SMALL_CPU_BAND {
        return small_cpu_value;
    }
    let ceiling = worker_ceiling(ctx, ctx.base.max_parallel_workers);
    ctx.factors.gather_workers.get(ctx.profile).min(ceiling)
}

fn max_worker_processes(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(worker_ceiling(ctx, ctx.base.max_worker_processes))
}

fn max_parallel_workers(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(worker_ceiling(ctx, ctx.base.max_parallel_workers))
}

fn max_parallel_workers_per_gather(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(gather_tier(ctx, ctx.base.max_parallel_workers_per_gather))
}

fn max_parallel_maintenance_workers(ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Count(gather_tier(ctx, ctx.base.max_parallel_maintenance_workers))
}

fn autovacuum(_ctx: &ScalingContext<'_>) -> RawValue {
    RawValue::Switch(true)
}
