//! Parameter recommendation engine
//!
//! Pure computation from hardware sizing and workload role to three
//! profiles of PostgreSQL settings:
//! - Stage 1 derives base values from CPU and memory ([`BaseValues`])
//! - Stage 2 selects the role's scaling table ([`RoleFactorTable`])
//! - Stage 3 fans out per profile and renders values ([`PARAMETERS`])

mod base;
mod format;
mod parameters;
mod rules;

#[cfg(test)]
mod tests;

pub use base::BaseValues;
pub use format::{numeric_part, RawValue, Unit};
pub use parameters::{
    classify, parameter, ParameterSpec, ScalingContext, AUTOVACUUM, DEFAULT_STATISTICS_TARGET,
    EFFECTIVE_CACHE_SIZE, FROM_COLLAPSE_LIMIT, GEQO_THRESHOLD, JOIN_COLLAPSE_LIMIT,
    MAINTENANCE_WORK_MEM, MAX_PARALLEL_MAINTENANCE_WORKERS, MAX_PARALLEL_WORKERS,
    MAX_PARALLEL_WORKERS_PER_GATHER, MAX_WORKER_PROCESSES, PARAMETERS, RANDOM_PAGE_COST,
    SHARED_BUFFERS, WORK_MEM,
};
pub use rules::{role_factors, CpuBand, PerProfile, RoleFactorTable};

use crate::error::AdvisorError;
use crate::models::{ParamMap, ParamValue, Profile, Recommendation, SizingInput, WorkloadRole};
use tracing::debug;

/// OLAP is rejected on servers with this many CPUs or fewer
pub const OLAP_MIN_CPU_EXCLUSIVE: u32 = 4;

/// Check that a sizing and role can be computed
pub fn validate(sizing: &SizingInput, role: WorkloadRole) -> Result<(), AdvisorError> {
    if sizing.cpu_count == 0 {
        return Err(AdvisorError::InvalidInput(
            "cpu_count must be positive".to_string(),
        ));
    }
    if sizing.memory_gb == 0 {
        return Err(AdvisorError::InvalidInput(
            "memory_gb must be positive".to_string(),
        ));
    }
    if role == WorkloadRole::Olap && sizing.cpu_count <= OLAP_MIN_CPU_EXCLUSIVE {
        return Err(AdvisorError::InvalidCombination(format!(
            "OLAP workloads are not supported on {} CPU(s)",
            sizing.cpu_count
        )));
    }
    Ok(())
}

/// Compute conservative, balanced and aggressive settings
pub fn recommend(sizing: SizingInput, role: WorkloadRole) -> Result<Recommendation, AdvisorError> {
    validate(&sizing, role)?;

    let base = BaseValues::from_sizing(&sizing);
    let factors = role_factors(role);

    debug!(
        cpu_count = sizing.cpu_count,
        memory_gb = sizing.memory_gb,
        role = %role,
        "Computing parameter recommendation"
    );

    let fan_out = |profile: Profile| {
        let ctx = ScalingContext {
            sizing: &sizing,
            base: &base,
            factors,
            profile,
        };
        render_profile(&ctx)
    };

    Ok(Recommendation {
        conservative: fan_out(Profile::Conservative),
        balanced: fan_out(Profile::Balanced),
        aggressive: fan_out(Profile::Aggressive),
    })
}

fn render_profile(ctx: &ScalingContext<'_>) -> ParamMap {
    let mut map = ParamMap::new();
    for spec in PARAMETERS {
        let raw = (spec.compute)(ctx);
        debug_assert_eq!(raw.unit(), spec.unit, "unit mismatch for {}", spec.name);
        map.push(ParamValue {
            name: spec.name.to_string(),
            value: raw.render(),
            apply_type: spec.apply_type,
        });
    }
    map
}
