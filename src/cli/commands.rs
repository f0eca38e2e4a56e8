//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::args::SortOrder;
use crate::consts::DEFAULT_TAIL_LINES;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Launch the mission controller (default)
    Launch(LaunchArgs),
    /// Truncate every log file in the logs directory
    Clean {
        /// Directory to clear (defaults to the logs directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Output a JSON summary
        #[arg(short, long)]
        json: bool,
    },
    /// List previous mission records
    Runs {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Sort order for results
        #[arg(short, long, value_enum, default_value = "asc")]
        order: SortOrder,
    },
    /// Show the last lines of the cumulative log
    Tail {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_TAIL_LINES)]
        lines: usize,

        /// Read this file instead of the cumulative log
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct LaunchArgs {
    /// Controller executable
    #[arg(short, long, value_name = "PROGRAM")]
    pub(crate) program: Option<String>,

    /// Argument placed before the output directory (repeatable)
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub(crate) args: Vec<String>,

    /// Mirror output to the terminal and the cumulative log
    #[arg(long)]
    pub(crate) cumulative: bool,

    /// Cumulative log file name inside the logs directory
    #[arg(long, value_name = "NAME")]
    pub(crate) cumulative_log: Option<String>,

    /// DISPLAY value used when none is set
    #[arg(long, value_name = "DISPLAY")]
    pub(crate) display: Option<String>,

    /// Virtualenv to activate for the controller
    #[arg(long, value_name = "DIR")]
    pub(crate) venv: Option<PathBuf>,

    /// Extra environment variable for the controller (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub(crate) env: Vec<(String, String)>,

    /// Print the resolved layout and command without running anything
    #[arg(long)]
    pub(crate) dry_run: bool,
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got \"{raw}\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_env_pair;

    #[test]
    fn env_pair_splits_on_first_equals() {
        assert_eq!(
            parse_env_pair("OPTS=a=b").unwrap(),
            ("OPTS".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_env_pair("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
    }

    #[test]
    fn env_pair_rejects_missing_key() {
        assert!(parse_env_pair("=value").is_err());
        assert!(parse_env_pair("NOVALUE").is_err());
    }
}
