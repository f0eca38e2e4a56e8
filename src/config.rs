use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::utils::debug_log;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) logs_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) missions_dir: Option<PathBuf>,
    /// Controller executable
    #[serde(default)]
    pub(crate) program: Option<String>,
    /// Leading arguments placed before the output directory
    #[serde(default)]
    pub(crate) args: Vec<String>,
    #[serde(default)]
    pub(crate) cumulative: bool,
    #[serde(default)]
    pub(crate) cumulative_log: Option<String>,
    #[serde(default)]
    pub(crate) display: Option<String>,
    /// Virtualenv root activated for the controller
    #[serde(default)]
    pub(crate) venv: Option<PathBuf>,
    #[serde(default)]
    pub(crate) env: BTreeMap<String, String>,
}

impl Config {
    /// Load an explicit config file, or the first parseable file in the search path.
    ///
    /// An explicit path must exist and parse; discovered files only warn.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
            let config = Self::parse(&content).map_err(|source| AppError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
            debug_log(format!("Loaded config from {}", path.display()));
            return Ok(config);
        }

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content) {
                    Ok(config) => {
                        debug_log(format!("Loaded config from {}", path.display()));
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        // 1. Working directory: ./missionctl.toml
        let mut paths = vec![PathBuf::from("missionctl.toml")];

        // 2. XDG config: ~/.config/missionctl/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("missionctl").join("config.toml"));
        }

        // 3. Platform config dir (macOS Application Support)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("missionctl").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 4. Home directory: ~/.missionctl.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".missionctl.toml"));
        }

        paths
    }
}
