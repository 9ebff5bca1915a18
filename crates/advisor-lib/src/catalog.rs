//! Supported hardware sizes
//!
//! Callers offer these as discrete choices and validate requests against
//! them before invoking the engine. The engine itself accepts any positive
//! sizing.

use serde::{Deserialize, Serialize};

use crate::engine::OLAP_MIN_CPU_EXCLUSIVE;
use crate::error::AdvisorError;
use crate::models::{SizingInput, WorkloadRole};

/// vCore options of the managed server tiers
pub const CPU_OPTIONS: &[u32] = &[1, 2, 4, 8, 16, 20, 32, 48, 64, 96, 128, 192];

/// Memory options in GB
pub const MEMORY_OPTIONS_GB: &[u32] = &[
    2, 4, 8, 16, 32, 48, 64, 80, 128, 160, 192, 256, 384, 432, 512, 672, 768, 1024, 1832,
];

/// Memory sizes that only exist on tiers too small for OLAP
const OLAP_EXCLUDED_MEMORY_GB: &[u32] = &[2, 4];

/// Options offered for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub cpu_options: Vec<u32>,
    pub memory_options_gb: Vec<u32>,
}

impl Catalog {
    /// Catalog as offered to a role, or the full catalog when no role is given
    pub fn for_role(role: Option<WorkloadRole>) -> Self {
        match role {
            Some(role) => Self {
                cpu_options: cpu_options(role),
                memory_options_gb: memory_options(role),
            },
            None => Self {
                cpu_options: CPU_OPTIONS.to_vec(),
                memory_options_gb: MEMORY_OPTIONS_GB.to_vec(),
            },
        }
    }
}

pub fn cpu_options(role: WorkloadRole) -> Vec<u32> {
    CPU_OPTIONS
        .iter()
        .copied()
        .filter(|&cpu| role != WorkloadRole::Olap || cpu > OLAP_MIN_CPU_EXCLUSIVE)
        .collect()
}

pub fn memory_options(role: WorkloadRole) -> Vec<u32> {
    MEMORY_OPTIONS_GB
        .iter()
        .copied()
        .filter(|gb| role != WorkloadRole::Olap || !OLAP_EXCLUDED_MEMORY_GB.contains(gb))
        .collect()
}

/// Reject sizings the selection menus would never offer for this role
pub fn validate_sizing(sizing: &SizingInput, role: WorkloadRole) -> Result<(), AdvisorError> {
    if role == WorkloadRole::Olap && sizing.cpu_count <= OLAP_MIN_CPU_EXCLUSIVE {
        return Err(AdvisorError::InvalidCombination(format!(
            "OLAP workloads are not supported on {} CPU(s)",
            sizing.cpu_count
        )));
    }
    if !cpu_options(role).contains(&sizing.cpu_count) {
        return Err(AdvisorError::InvalidInput(format!(
            "{} CPUs is not a supported size",
            sizing.cpu_count
        )));
    }
    if !memory_options(role).contains(&sizing.memory_gb) {
        return Err(AdvisorError::InvalidInput(format!(
            "{} GB memory is not a supported size for {}",
            sizing.memory_gb, role
        )));
    }
    Ok(())
}
