//! `pgadvisor export`

use advisor_lib::{Profile, WorkloadRole};
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::recommend::requester;
use super::{sizing, Backend};
use crate::output::{print_audit_warnings, print_success, OutputFormat};

pub struct ExportArgs {
    pub cpus: u32,
    pub memory_gb: u32,
    pub role: WorkloadRole,
    pub profile: Option<Profile>,
    pub ticket: Option<String>,
    pub email: Option<String>,
    pub output: Option<PathBuf>,
}

pub async fn run(backend: &Backend, args: ExportArgs) -> Result<()> {
    let requester = requester(args.ticket, args.email)?;
    let sizing = sizing(args.cpus, args.memory_gb)?;
    let (csv, warnings) = backend
        .export(sizing, args.role, args.profile, requester)
        .await?;

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Recommendations exported to {}", path.display()));
        }
        None => print!("{}", csv),
    }

    // stdout may carry the CSV
    print_audit_warnings(&warnings, OutputFormat::Csv);

    Ok(())
}
