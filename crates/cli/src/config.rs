//! Configuration management for the CLI

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// CLI configuration, read from `~/.config/pgadvisor/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Advisor service URL; unset means recommendations are computed locally
    pub api_url: Option<String>,
    /// Default output format
    pub default_format: Option<String>,
    /// Audit log for locally computed recommendations
    pub audit_log: Option<PathBuf>,
    /// Requester email used when `--email` is omitted
    pub email: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    fn config_dir() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("pgadvisor"))
    }

    /// Flag, then config file, then table
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = flag {
            return Ok(format);
        }
        match self.default_format.as_deref() {
            Some(name) => OutputFormat::from_str(name, true)
                .map_err(|e| anyhow::anyhow!("Invalid default_format in config: {}", e)),
            None => Ok(OutputFormat::Table),
        }
    }

    /// Flag or env var, then config file; blank means local mode
    pub fn resolve_api_url(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.api_url.clone())
            .filter(|url| !url.trim().is_empty())
    }

    /// Flag, then config file, then `audit.jsonl` next to the config file
    pub fn resolve_audit_log(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.audit_log.clone()) {
            Some(path) => Ok(path),
            None => Ok(Self::config_dir()?.join("audit.jsonl")),
        }
    }
}
