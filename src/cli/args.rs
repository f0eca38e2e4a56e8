//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "missionctl")]
#[command(about = "Launch the mission controller and look after its logs", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Config file (default: ./missionctl.toml, then ~/.config/missionctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Directory holding mission logs
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) logs_dir: Option<PathBuf>,

    /// Directory holding mission output directories
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) missions_dir: Option<PathBuf>,

    /// Timezone for mission timestamps (e.g., "UTC", "Europe/Berlin")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.debug && config.debug {
            self.debug = true;
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.logs_dir.is_none() {
            self.logs_dir = config.logs_dir.clone();
        }
        if self.missions_dir.is_none() {
            self.missions_dir = config.missions_dir.clone();
        }
        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
