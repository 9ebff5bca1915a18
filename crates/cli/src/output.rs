//! Output formatting utilities

use advisor_lib::{Advice, Catalog, Profile, ProfileSelection};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Shown before any table output
pub const TESTING_BANNER: &str =
    "This tool is under testing. Use the recommendations at your own risk.";

/// Row for the three-profile comparison table
#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Conservative")]
    conservative: String,
    #[tabled(rename = "Balanced")]
    balanced: String,
    #[tabled(rename = "Aggressive")]
    aggressive: String,
    #[tabled(rename = "Apply Type")]
    apply_type: String,
}

/// Row for a single-profile table
#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Apply Type")]
    apply_type: String,
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Options")]
    options: String,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled>(items: Vec<T>) {
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_banner() {
    print_warning(TESTING_BANNER);
    println!();
}

/// Audit warnings go to stderr unless the output is a table, so JSON and CSV stay parseable
pub fn print_audit_warnings<W: std::fmt::Display>(warnings: &[W], format: OutputFormat) {
    for warning in warnings {
        let message = format!("Recommendation was not audited: {}", warning);
        match format {
            OutputFormat::Table => print_warning(&message),
            OutputFormat::Json | OutputFormat::Csv => eprintln!("warning: {}", message),
        }
    }
}

/// Color an apply type; static changes need a restart
pub fn color_apply_type(apply_type: &str) -> String {
    match apply_type {
        "static" => apply_type.yellow().to_string(),
        _ => apply_type.green().to_string(),
    }
}

pub fn print_recommendation_table(advice: &Advice, selection: ProfileSelection) {
    println!(
        "{} {} CPUs, {} GB memory, {} workload",
        "Sizing:".bold(),
        advice.sizing.cpu_count,
        advice.sizing.memory_gb,
        advice.role
    );
    println!();

    let recommendation = &advice.recommendation;
    match selection {
        ProfileSelection::All => {
            let rows: Vec<ComparisonRow> = recommendation
                .conservative
                .iter()
                .map(|param| {
                    let value_in = |profile: Profile| {
                        recommendation
                            .profile(profile)
                            .value(&param.name)
                            .unwrap_or("-")
                            .to_string()
                    };
                    ComparisonRow {
                        name: param.name.clone(),
                        conservative: param.value.clone(),
                        balanced: value_in(Profile::Balanced),
                        aggressive: value_in(Profile::Aggressive),
                        apply_type: color_apply_type(&param.apply_type.to_string()),
                    }
                })
                .collect();
            print_table(rows);
        }
        ProfileSelection::Single(profile) => {
            let rows: Vec<ProfileRow> = recommendation
                .profile(profile)
                .iter()
                .map(|param| ProfileRow {
                    name: param.name.clone(),
                    value: param.value.clone(),
                    apply_type: color_apply_type(&param.apply_type.to_string()),
                })
                .collect();
            println!("{} {}", "Profile:".bold(), profile.label());
            print_table(rows);
        }
    }

    println!();
    print_info("Static parameters take effect only after a server restart");
}

pub fn print_catalog_table(catalog: &Catalog) {
    let join = |values: &[u32]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    print_table(vec![
        CatalogRow {
            resource: "CPU count".to_string(),
            options: join(&catalog.cpu_options),
        },
        CatalogRow {
            resource: "Memory (GB)".to_string(),
            options: join(&catalog.memory_options_gb),
        },
    ]);
}
