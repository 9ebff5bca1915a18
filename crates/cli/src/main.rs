//! PostgreSQL Parameter Advisor CLI
//!
//! Computes conservative, balanced and aggressive PostgreSQL settings for a
//! hardware size and workload role, locally or through the advisor service.

mod client;
mod commands;
mod config;
mod output;

use advisor_lib::{Profile, WorkloadRole};
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{catalog, export, recommend, Backend};
use std::path::PathBuf;

/// PostgreSQL Parameter Advisor CLI
#[derive(Parser)]
#[command(name = "pgadvisor")]
#[command(author, version, about = "CLI for the PostgreSQL Parameter Advisor", long_about = None)]
pub struct Cli {
    /// Advisor service URL; computes locally when unset (can also be set via PGADVISOR_API_URL)
    #[arg(long, env = "PGADVISOR_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend parameters for a hardware size and workload role
    Recommend {
        /// Number of CPUs
        #[arg(long)]
        cpus: u32,

        /// Memory in GB
        #[arg(long)]
        memory: u32,

        /// Workload role (OLTP, OLAP, RAG, Mixed)
        #[arg(long)]
        role: WorkloadRole,

        /// Show a single profile (conservative, balanced, aggressive)
        #[arg(long)]
        profile: Option<Profile>,

        /// Change or incident ticket recorded in the audit log
        #[arg(long)]
        ticket: Option<String>,

        /// Requester email recorded in the audit log
        #[arg(long)]
        email: Option<String>,

        /// Local audit log (JSON lines)
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },

    /// Show the supported hardware catalog
    Catalog {
        /// Only sizes valid for this workload role
        #[arg(long)]
        role: Option<WorkloadRole>,
    },

    /// Export recommendations as CSV
    Export {
        /// Number of CPUs
        #[arg(long)]
        cpus: u32,

        /// Memory in GB
        #[arg(long)]
        memory: u32,

        /// Workload role (OLTP, OLAP, RAG, Mixed)
        #[arg(long)]
        role: WorkloadRole,

        /// Export a single profile
        #[arg(long)]
        profile: Option<Profile>,

        /// Change or incident ticket recorded in the audit log
        #[arg(long)]
        ticket: Option<String>,

        /// Requester email recorded in the audit log
        #[arg(long)]
        email: Option<String>,

        /// Local audit log (JSON lines)
        #[arg(long)]
        audit_log: Option<PathBuf>,

        /// Output file path (prints to stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let config = config::Config::load()?;
    let format = config.resolve_format(cli.format)?;
    let api_url = config.resolve_api_url(cli.api_url);

    let audit_flag = match &cli.command {
        Commands::Recommend { audit_log, .. } | Commands::Export { audit_log, .. } => {
            audit_log.clone()
        }
        Commands::Catalog { .. } => None,
    };
    let backend = match &api_url {
        Some(url) => Backend::remote(url)?,
        None => Backend::local(config.resolve_audit_log(audit_flag)?),
    };

    // Execute command
    match cli.command {
        Commands::Recommend {
            cpus,
            memory,
            role,
            profile,
            ticket,
            email,
            audit_log: _,
        } => {
            let args = recommend::RecommendArgs {
                cpus,
                memory_gb: memory,
                role,
                profile,
                ticket,
                email: email.or(config.email),
            };
            recommend::run(&backend, args, format).await?;
        }
        Commands::Catalog { role } => {
            catalog::run(&backend, role, format).await?;
        }
        Commands::Export {
            cpus,
            memory,
            role,
            profile,
            ticket,
            email,
            audit_log: _,
            output,
        } => {
            let args = export::ExportArgs {
                cpus,
                memory_gb: memory,
                role,
                profile,
                ticket,
                email: email.or(config.email),
                output,
            };
            export::run(&backend, args).await?;
        }
    }

    Ok(())
}
