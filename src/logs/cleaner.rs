use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CleanError;
use crate::utils::debug_log;

#[derive(Debug, Serialize)]
pub(crate) struct FailedFile {
    pub(crate) path: PathBuf,
    pub(crate) error: String,
}

/// Outcome of clearing one log directory
#[derive(Debug, Serialize)]
pub(crate) struct CleanReport {
    pub(crate) directory: PathBuf,
    pub(crate) found: bool,
    pub(crate) cleared: Vec<PathBuf>,
    pub(crate) failed: Vec<FailedFile>,
}

impl CleanReport {
    pub(crate) fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Truncate every regular file directly inside `dir` to zero length.
///
/// Nothing is deleted or renamed. Subdirectories and symlinks are left alone.
/// A missing directory is reported through `found`, not as an error.
pub(crate) fn clean_dir(dir: &Path) -> Result<CleanReport, CleanError> {
    clean_dir_with(dir, truncate)
}

fn clean_dir_with(
    dir: &Path,
    mut truncate: impl FnMut(&Path) -> Result<(), CleanError>,
) -> Result<CleanReport, CleanError> {
    let mut report = CleanReport {
        directory: dir.to_path_buf(),
        found: false,
        cleared: Vec::new(),
        failed: Vec::new(),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(report),
        Err(source) => {
            return Err(CleanError::List {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    report.found = true;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CleanError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        match entry.file_type() {
            Ok(ft) if ft.is_file() => files.push(entry.path()),
            Ok(_) => debug_log(format!("skipping non-file {}", entry.path().display())),
            Err(e) => debug_log(format!("cannot stat {}: {e}", entry.path().display())),
        }
    }
    files.sort();

    for path in files {
        match truncate(&path) {
            Ok(()) => report.cleared.push(path),
            Err(e) => report.failed.push(FailedFile {
                path,
                error: e.to_string(),
            }),
        }
    }

    Ok(report)
}

fn truncate(path: &Path) -> Result<(), CleanError> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map(drop)
        .map_err(|source| CleanError::Truncate {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
pub(crate) fn clean_dir_failing_on(dir: &Path, name: &str) -> Result<CleanReport, CleanError> {
    clean_dir_with(dir, |path| {
        if path.file_name().is_some_and(|n| n == name) {
            Err(CleanError::Truncate {
                path: path.to_path_buf(),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
            })
        } else {
            truncate(path)
        }
    })
}
