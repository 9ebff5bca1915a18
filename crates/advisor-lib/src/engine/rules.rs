//! Stage 2: per-role, per-profile scaling tables
//!
//! The tables are plain constants. Adding a role means adding a table and a
//! match arm in [`role_factors`]; the computation pipeline does not change.

use crate::models::{Profile, WorkloadRole};

/// One value per profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerProfile<T> {
    pub conservative: T,
    pub balanced: T,
    pub aggressive: T,
}

impl<T: Copy> PerProfile<T> {
    pub const fn new(conservative: T, balanced: T, aggressive: T) -> Self {
        Self {
            conservative,
            balanced,
            aggressive,
        }
    }

    pub fn get(&self, profile: Profile) -> T {
        match profile {
            Profile::Conservative => self.conservative,
            Profile::Balanced => self.balanced,
            Profile::Aggressive => self.aggressive,
        }
    }
}

/// Override that applies while the server has at most `max_cpus` CPUs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuBand {
    pub max_cpus: u32,
    pub values: PerProfile<u32>,
}

/// Scaling factors for one workload role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleFactorTable {
    /// Multiplier on the base random_page_cost
    pub random_page_cost: PerProfile<f64>,
    /// Multiplier on the base default_statistics_target
    pub statistics_target: PerProfile<u32>,
    /// Multiplier on the base shared_buffers
    pub shared_buffers: PerProfile<f64>,
    /// Absolute MB
    pub work_mem_mb: PerProfile<u32>,
    /// Absolute MB
    pub maintenance_work_mem_mb: PerProfile<u32>,
    /// Absolute threshold
    pub geqo_threshold: PerProfile<u32>,
    pub geqo_threshold_small_cpu: Option<CpuBand>,
    /// Workers per gather node once the CPU band no longer pins it
    pub gather_workers: PerProfile<u32>,
}

impl RoleFactorTable {
    pub fn geqo_threshold(&self, profile: Profile, cpu_count: u32) -> u32 {
        match self.geqo_threshold_small_cpu {
            Some(band) if cpu_count <= band.max_cpus => band.values.get(profile),
            _ => self.geqo_threshold.get(profile),
        }
    }
}

const MAINTENANCE_WORK_MEM_MB: PerProfile<u32> = PerProfile::new(1, 1, 2);
const GATHER_WORKERS: PerProfile<u32> = PerProfile::new(2, 4, 8);

pub const OLTP_FACTORS: RoleFactorTable = RoleFactorTable {
    random_page_cost: PerProfile::new(1.2, 1.1, 1.08),
    statistics_target: PerProfile::new(2, 5, 10),
    shared_buffers: PerProfile::new(1.0, 1.2, 1.5),
    work_mem_mb: PerProfile::new(16, 32, 64),
    maintenance_work_mem_mb: MAINTENANCE_WORK_MEM_MB,
    geqo_threshold: PerProfile::new(16, 20, 24),
    geqo_threshold_small_cpu: None,
    gather_workers: GATHER_WORKERS,
};

// Sequential scans are favoured and planning gets more room for large joins.
pub const OLAP_FACTORS: RoleFactorTable = RoleFactorTable {
    random_page_cost: PerProfile::new(1.1, 1.08, 1.05),
    statistics_target: PerProfile::new(4, 8, 16),
    shared_buffers: PerProfile::new(1.0, 1.25, 1.6),
    work_mem_mb: PerProfile::new(32, 64, 128),
    maintenance_work_mem_mb: MAINTENANCE_WORK_MEM_MB,
    geqo_threshold: PerProfile::new(16, 24, 32),
    geqo_threshold_small_cpu: Some(CpuBand {
        max_cpus: 8,
        values: PerProfile::new(12, 14, 16),
    }),
    gather_workers: GATHER_WORKERS,
};

pub const RAG_FACTORS: RoleFactorTable = RoleFactorTable {
    random_page_cost: PerProfile::new(1.15, 1.1, 1.1),
    statistics_target: PerProfile::new(2, 5, 10),
    shared_buffers: PerProfile::new(1.0, 1.25, 1.6),
    work_mem_mb: PerProfile::new(32, 64, 128),
    maintenance_work_mem_mb: MAINTENANCE_WORK_MEM_MB,
    geqo_threshold: PerProfile::new(16, 22, 28),
    geqo_threshold_small_cpu: None,
    gather_workers: GATHER_WORKERS,
};

pub const MIXED_FACTORS: RoleFactorTable = RoleFactorTable {
    random_page_cost: PerProfile::new(1.15, 1.1, 1.1),
    statistics_target: PerProfile::new(2, 5, 10),
    shared_buffers: PerProfile::new(1.0, 1.2, 1.5),
    work_mem_mb: PerProfile::new(32, 64, 128),
    maintenance_work_mem_mb: MAINTENANCE_WORK_MEM_MB,
    geqo_threshold: PerProfile::new(16, 24, 32),
    geqo_threshold_small_cpu: None,
    gather_workers: GATHER_WORKERS,
};

/// Scaling table for a role
pub fn role_factors(role: WorkloadRole) -> &'static RoleFactorTable {
    match role {
        WorkloadRole::Oltp => &OLTP_FACTORS,
        WorkloadRole::Olap => &OLAP_FACTORS,
        WorkloadRole::Rag => &RAG_FACTORS,
        WorkloadRole::Mixed => &MIXED_FACTORS,
    }
}
