use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::AppError;

#[derive(Debug)]
pub(crate) struct Tail {
    pub(crate) lines: Vec<String>,
    pub(crate) total_lines: usize,
}

/// Last `count` non-empty lines of a log file, or `None` if it does not exist.
///
/// Controller output is not guaranteed to be UTF-8, so bytes are decoded lossily.
pub(crate) fn tail_lines(path: &Path, count: usize) -> Result<Option<Tail>, AppError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(AppError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let all: Vec<&str> = text.lines().collect();
    let total_lines = all.len();
    let non_empty: Vec<&str> = all
        .iter()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .collect();
    let start = non_empty.len().saturating_sub(count);
    let lines = non_empty[start..].iter().map(|l| l.to_string()).collect();
    Ok(Some(Tail { lines, total_lines }))
}
