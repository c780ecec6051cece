pub mod cli;
pub mod toml_config;

use crate::core::projector::{ColumnPolicy, MatchMode};
use crate::core::viewer::ViewSettings;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "call-analyzer")]
#[command(about = "Browse sales-call transcriptions and their analysis")]
pub struct CliConfig {
    #[arg(long, env = "API_BASE_URL", help = "Base URL of the transcription API")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Page to load (starts at 1)")]
    pub page: Option<u32>,

    #[arg(long, help = "Show the analysis of this row (1-based)")]
    pub row: Option<usize>,

    #[arg(long, value_enum, help = "How analysis fields are matched against headers")]
    pub match_mode: Option<MatchMode>,

    #[arg(long, value_enum, help = "Columns of the summary table")]
    pub columns: Option<ColumnPolicy>,

    #[arg(long, help = "HTTP timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Write the page as CSV and JSON into this directory")]
    pub export_dir: Option<String>,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Navigate pages from stdin")]
    pub interactive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Effective settings after merging flags, the settings file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page: u32,
    pub row: Option<usize>,
    pub match_mode: MatchMode,
    pub column_policy: ColumnPolicy,
    pub timeout_seconds: u64,
    pub export_dir: Option<String>,
    pub interactive: bool,
}

impl AppConfig {
    /// Flags take precedence over the file, the file over built-in defaults.
    pub fn resolve(cli: &CliConfig, file: Option<&TomlConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();
        Self {
            api_base_url: cli
                .api_base_url
                .clone()
                .or(file.api.base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            page: cli.page.or(file.view.page).unwrap_or(1),
            row: cli.row,
            match_mode: cli.match_mode.or(file.view.match_mode).unwrap_or_default(),
            column_policy: cli.columns.or(file.view.columns).unwrap_or_default(),
            timeout_seconds: cli
                .timeout_seconds
                .or(file.api.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            export_dir: cli.export_dir.clone().or(file.export.dir),
            interactive: cli.interactive,
        }
    }

    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::debug!("Reading settings from {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };
        Ok(Self::resolve(cli, file.as_ref()))
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings::from_config(self)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_positive_number("page", u64::from(self.page), 1)?;
        if let Some(row) = self.row {
            validate_positive_number("row", row as u64, 1)?;
        }
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        if let Some(dir) = &self.export_dir {
            validate_path("export_dir", dir)?;
        }
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    fn column_policy(&self) -> ColumnPolicy {
        self.column_policy
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn export_dir(&self) -> Option<&str> {
        self.export_dir.as_deref()
    }
}
