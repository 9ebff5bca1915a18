//! Tests for the recommendation engine

use super::*;
use crate::catalog::{cpu_options, memory_options};
use crate::models::ApplyType;

fn sizing(cpus: i64, mem: i64) -> SizingInput {
    SizingInput::new(cpus, mem).unwrap()
}

fn values(rec: &Recommendation, name: &str) -> [String; 3] {
    Profile::ALL.map(|p| rec.profile(p).value(name).unwrap().to_string())
}

fn all_valid_inputs() -> Vec<(SizingInput, WorkloadRole)> {
    let mut inputs = Vec::new();
    for role in WorkloadRole::ALL {
        for &cpu in &cpu_options(role) {
            for &mem in &memory_options(role) {
                inputs.push((sizing(cpu as i64, mem as i64), role));
            }
        }
    }
    inputs
}

#[test]
fn test_profiles_share_parameter_names() {
    for (sizing, role) in all_valid_inputs() {
        let rec = recommend(sizing, role).unwrap();
        let expected: Vec<_> = PARAMETERS.iter().map(|p| p.name).collect();
        for (_, params) in rec.iter() {
            let names: Vec<_> = params.names().collect();
            assert_eq!(names, expected, "{:?} {:?}", sizing, role);
        }
    }
}

#[test]
fn test_autovacuum_always_on() {
    for (sizing, role) in all_valid_inputs() {
        let rec = recommend(sizing, role).unwrap();
        assert_eq!(values(&rec, AUTOVACUUM), ["ON", "ON", "ON"]);
    }
}

#[test]
fn test_apply_types() {
    let rec = recommend(sizing(16, 64), WorkloadRole::Rag).unwrap();
    for (_, params) in rec.iter() {
        for p in params {
            let expected = if p.name == SHARED_BUFFERS || p.name == MAX_WORKER_PROCESSES {
                ApplyType::Static
            } else {
                ApplyType::Dynamic
            };
            assert_eq!(p.apply_type, expected, "{}", p.name);
        }
    }
}

#[test]
fn test_work_mem_is_monotonic() {
    for (sizing, role) in all_valid_inputs() {
        let rec = recommend(sizing, role).unwrap();
        let kb = values(&rec, WORK_MEM).map(|v| numeric_part(&v).unwrap());
        assert!(kb[0] <= kb[1] && kb[1] <= kb[2], "{:?} {:?}", sizing, role);
    }
}

#[test]
fn test_olap_rejected_on_small_cpu() {
    for cpu in [1, 2, 4] {
        for &mem in crate::catalog::MEMORY_OPTIONS_GB {
            let err = recommend(sizing(cpu, mem as i64), WorkloadRole::Olap).unwrap_err();
            assert!(matches!(err, AdvisorError::InvalidCombination(_)));
        }
    }
}

#[test]
fn test_small_cpu_allowed_for_other_roles() {
    for role in [WorkloadRole::Oltp, WorkloadRole::Rag, WorkloadRole::Mixed] {
        assert!(recommend(sizing(2, 4), role).is_ok());
    }
}

#[test]
fn test_zero_sizing_rejected() {
    let zero_cpu = SizingInput {
        cpu_count: 0,
        memory_gb: 16,
    };
    assert!(matches!(
        recommend(zero_cpu, WorkloadRole::Oltp),
        Err(AdvisorError::InvalidInput(_))
    ));

    let zero_mem = SizingInput {
        cpu_count: 4,
        memory_gb: 0,
    };
    assert!(matches!(
        recommend(zero_mem, WorkloadRole::Mixed),
        Err(AdvisorError::InvalidInput(_))
    ));
}

#[test]
fn test_olap_shared_buffers() {
    let rec = recommend(sizing(32, 128), WorkloadRole::Olap).unwrap();
    assert_eq!(values(&rec, SHARED_BUFFERS), ["32768MB", "40960MB", "52428MB"]);
    assert_eq!(
        values(&rec, EFFECTIVE_CACHE_SIZE),
        ["98304MB", "98304MB", "98304MB"]
    );
}

#[test]
fn test_oltp_work_mem_independent_of_memory() {
    for mem in [16, 256] {
        let rec = recommend(sizing(4, mem), WorkloadRole::Oltp).unwrap();
        assert_eq!(values(&rec, WORK_MEM), ["16384kB", "32768kB", "65536kB"]);
    }
}

#[test]
fn test_mixed_large_server_workers() {
    let rec = recommend(sizing(96, 256), WorkloadRole::Mixed).unwrap();
    assert_eq!(values(&rec, MAX_WORKER_PROCESSES), ["96", "96", "96"]);
    assert_eq!(values(&rec, MAX_PARALLEL_WORKERS), ["96", "96", "96"]);
    assert_eq!(values(&rec, MAX_PARALLEL_WORKERS_PER_GATHER), ["2", "4", "8"]);
    assert_eq!(values(&rec, MAX_PARALLEL_MAINTENANCE_WORKERS), ["2", "4", "8"]);
}

#[test]
fn test_small_server_workers_pinned() {
    let rec = recommend(sizing(2, 8), WorkloadRole::Oltp).unwrap();
    assert_eq!(values(&rec, MAX_WORKER_PROCESSES), ["8", "8", "8"]);
    assert_eq!(values(&rec, MAX_PARALLEL_WORKERS_PER_GATHER), ["2", "2", "2"]);
    assert_eq!(values(&rec, MAX_PARALLEL_MAINTENANCE_WORKERS), ["2", "2", "2"]);
}

#[test]
fn test_random_page_cost_and_statistics() {
    let oltp = recommend(sizing(8, 32), WorkloadRole::Oltp).unwrap();
    assert_eq!(values(&oltp, RANDOM_PAGE_COST), ["1.2", "1.1", "1.08"]);
    assert_eq!(values(&oltp, DEFAULT_STATISTICS_TARGET), ["200", "500", "1000"]);

    let olap = recommend(sizing(8, 32), WorkloadRole::Olap).unwrap();
    assert_eq!(values(&olap, RANDOM_PAGE_COST), ["1.1", "1.08", "1.05"]);
    assert_eq!(values(&olap, DEFAULT_STATISTICS_TARGET), ["400", "800", "1600"]);
}

#[test]
fn test_geqo_and_collapse_limits() {
    let olap_small = recommend(sizing(8, 32), WorkloadRole::Olap).unwrap();
    assert_eq!(values(&olap_small, GEQO_THRESHOLD), ["12", "14", "16"]);
    assert_eq!(values(&olap_small, FROM_COLLAPSE_LIMIT), ["9", "10", "12"]);

    let olap_large = recommend(sizing(32, 128), WorkloadRole::Olap).unwrap();
    assert_eq!(values(&olap_large, GEQO_THRESHOLD), ["16", "24", "32"]);
    assert_eq!(values(&olap_large, JOIN_COLLAPSE_LIMIT), ["12", "18", "24"]);

    let rag = recommend(sizing(16, 64), WorkloadRole::Rag).unwrap();
    assert_eq!(values(&rag, GEQO_THRESHOLD), ["16", "22", "28"]);
    assert_eq!(values(&rag, FROM_COLLAPSE_LIMIT), ["12", "16", "21"]);

    let oltp = recommend(sizing(16, 64), WorkloadRole::Oltp).unwrap();
    assert_eq!(values(&oltp, JOIN_COLLAPSE_LIMIT), ["12", "15", "18"]);
}

#[test]
fn test_maintenance_work_mem() {
    for role in WorkloadRole::ALL {
        let rec = recommend(sizing(16, 64), role).unwrap();
        assert_eq!(values(&rec, MAINTENANCE_WORK_MEM), ["1MB", "1MB", "2MB"]);
    }
}

#[test]
fn test_recommend_is_idempotent() {
    let first = recommend(sizing(48, 384), WorkloadRole::Rag).unwrap();
    let second = recommend(sizing(48, 384), WorkloadRole::Rag).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
