use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No controller program configured (pass --program or set `program` in missionctl.toml)")]
    NoProgram,

    #[error("{0}")]
    Launch(#[from] LaunchError),

    #[error("{0}")]
    Clean(#[from] CleanError),
}

#[derive(Debug, Error)]
pub(crate) enum LaunchError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open log file {path}: {source}")]
    OpenLog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Program not found: {program}")]
    NotFound { program: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed to create output pipe: {0}")]
    Pipe(std::io::Error),

    #[error("Failed to relay program output: {0}")]
    Relay(std::io::Error),

    #[error("Failed to write cumulative log: {0}")]
    Announce(std::io::Error),

    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub(crate) enum CleanError {
    #[error("Failed to list {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to clear {path}: {source}")]
    Truncate {
        path: PathBuf,
        source: std::io::Error,
    },
}
