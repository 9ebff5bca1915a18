//! `pgadvisor catalog`

use advisor_lib::{catalog_to_csv, WorkloadRole};
use anyhow::{Context, Result};

use super::Backend;
use crate::output::{print_catalog_table, print_info, print_json, OutputFormat};

pub async fn run(backend: &Backend, role: Option<WorkloadRole>, format: OutputFormat) -> Result<()> {
    let catalog = backend.catalog(role).await?;

    match format {
        OutputFormat::Table => {
            print_catalog_table(&catalog);
            if role == Some(WorkloadRole::Olap) {
                print_info("OLAP sizing starts at 8 CPUs");
            }
        }
        OutputFormat::Json => print_json(&catalog)?,
        OutputFormat::Csv => {
            print!("{}", catalog_to_csv(&catalog).context("Failed to render CSV")?)
        }
    }

    Ok(())
}
