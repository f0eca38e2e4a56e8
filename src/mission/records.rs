use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::consts::{MISSION_DIR_PREFIX, TIMESTAMP_FORMAT};
use crate::utils::debug_log;

use super::layout::log_file_for;

/// A mission output directory found on disk
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MissionRecord {
    pub(crate) timestamp: String,
    #[serde(skip)]
    pub(crate) started: Option<NaiveDateTime>,
    pub(crate) output_dir: PathBuf,
    pub(crate) artifacts: usize,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) log_bytes: Option<u64>,
}

/// Collect `mission_record_*` directories under `missions_dir`, oldest first.
pub(crate) fn find_records(missions_dir: &Path, logs_dir: &Path) -> Vec<MissionRecord> {
    let root = glob::Pattern::escape(&missions_dir.to_string_lossy());
    let pattern = Path::new(&root).join(format!("{MISSION_DIR_PREFIX}*"));
    let pattern = pattern.to_string_lossy();

    let entries = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            debug_log(format!("bad records pattern {pattern}: {e}"));
            return Vec::new();
        }
    };

    let mut records: Vec<MissionRecord> = entries
        .filter_map(Result::ok)
        .filter(|p| p.is_dir())
        .filter_map(|dir| record_for(dir, logs_dir))
        .collect();
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    records
}

fn record_for(output_dir: PathBuf, logs_dir: &Path) -> Option<MissionRecord> {
    let name = output_dir.file_name()?.to_string_lossy().into_owned();
    let timestamp = name.strip_prefix(MISSION_DIR_PREFIX)?.to_string();
    let started = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).ok();
    if started.is_none() {
        debug_log(format!("{name} has an unrecognised timestamp"));
    }

    let artifacts = fs::read_dir(&output_dir).map(Iterator::count).unwrap_or(0);
    let log = log_file_for(logs_dir, &timestamp);
    let log_bytes = fs::metadata(&log).ok().map(|m| m.len());

    Some(MissionRecord {
        started,
        artifacts,
        log_file: log_bytes.map(|_| log),
        log_bytes,
        output_dir,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_records_with_logs_sorted_by_time() {
        let dir = tempfile::tempdir().unwrap();
        let missions = dir.path().join("missions");
        let logs = dir.path().join("logs");
        fs::create_dir_all(missions.join("mission_record_2026-02-01_12-00-00")).unwrap();
        fs::create_dir_all(missions.join("mission_record_2026-01-15_08-30-00")).unwrap();
        fs::create_dir_all(&logs).unwrap();
        fs::write(
            missions.join("mission_record_2026-02-01_12-00-00/frame_0001.jpg"),
            "x",
        )
        .unwrap();
        fs::write(logs.join("mission_2026-02-01_12-00-00.log"), "hello").unwrap();

        let records = find_records(&missions, &logs);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "2026-01-15_08-30-00");
        assert_eq!(records[0].log_bytes, None);
        assert_eq!(records[0].artifacts, 0);
        assert_eq!(records[1].timestamp, "2026-02-01_12-00-00");
        assert_eq!(records[1].artifacts, 1);
        assert_eq!(records[1].log_bytes, Some(5));
        assert!(records[1].started.is_some());
    }

    #[test]
    fn ignores_unrelated_entries() {
        let dir = tempfile::tempdir().unwrap();
        let missions = dir.path().join("missions");
        fs::create_dir_all(missions.join("scratch")).unwrap();
        fs::write(missions.join("mission_record_file"), "not a dir").unwrap();

        assert!(find_records(&missions, &dir.path().join("logs")).is_empty());
    }

    #[test]
    fn missing_missions_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_records(&dir.path().join("missions"), dir.path()).is_empty());
    }

    #[test]
    fn glob_metacharacters_in_root_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let missions = dir.path().join("site[a]");
        fs::create_dir_all(missions.join("mission_record_2026-03-03_03-03-03")).unwrap();

        let records = find_records(&missions, dir.path());
        assert_eq!(records.len(), 1);
    }
}
