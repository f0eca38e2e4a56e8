use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{MISSION_DIR_PREFIX, MISSION_LOG_PREFIX, TIMESTAMP_FORMAT};
use crate::error::LaunchError;
use crate::utils::{Clock, Timezone};

/// Where mission artifacts go, independent of any particular run
#[derive(Debug, Clone)]
pub(crate) struct LayoutSettings {
    pub(crate) missions_dir: PathBuf,
    pub(crate) logs_dir: PathBuf,
    pub(crate) cumulative_log: String,
}

/// Paths for a single mission run
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MissionLayout {
    pub(crate) timestamp: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) logs_dir: PathBuf,
    pub(crate) log_file: PathBuf,
    pub(crate) cumulative_log: PathBuf,
}

impl MissionLayout {
    pub(crate) fn new(settings: &LayoutSettings, clock: &dyn Clock, timezone: Timezone) -> Self {
        let timestamp = timezone.format(clock.now(), TIMESTAMP_FORMAT);
        Self::for_timestamp(settings, timestamp)
    }

    pub(crate) fn for_timestamp(settings: &LayoutSettings, timestamp: String) -> Self {
        let output_dir = settings
            .missions_dir
            .join(format!("{MISSION_DIR_PREFIX}{timestamp}"));
        let log_file = log_file_for(&settings.logs_dir, &timestamp);
        MissionLayout {
            output_dir,
            log_file,
            logs_dir: settings.logs_dir.clone(),
            cumulative_log: settings.logs_dir.join(&settings.cumulative_log),
            timestamp,
        }
    }

    /// Create the output and logs directories, parents included.
    ///
    /// Both already existing is fine.
    pub(crate) fn prepare(&self) -> Result<(), LaunchError> {
        for dir in [&self.output_dir, &self.logs_dir] {
            fs::create_dir_all(dir).map_err(|source| LaunchError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

pub(crate) fn log_file_for(logs_dir: &Path, timestamp: &str) -> PathBuf {
    logs_dir.join(format!("{MISSION_LOG_PREFIX}{timestamp}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::FixedClock;
    use chrono::{DateTime, Utc};

    fn settings(root: &Path) -> LayoutSettings {
        LayoutSettings {
            missions_dir: root.join("missions"),
            logs_dir: root.join("logs"),
            cumulative_log: "missions.log".to_string(),
        }
    }

    fn clock(ts: &str) -> FixedClock {
        FixedClock(ts.parse::<DateTime<Utc>>().unwrap())
    }

    #[test]
    fn names_follow_timestamp_format() {
        let root = Path::new("/srv/ctl");
        let layout = MissionLayout::new(
            &settings(root),
            &clock("2026-01-02T03:04:05Z"),
            Timezone::Named(chrono_tz::UTC),
        );
        assert_eq!(layout.timestamp, "2026-01-02_03-04-05");
        assert_eq!(
            layout.output_dir,
            root.join("missions/mission_record_2026-01-02_03-04-05")
        );
        assert_eq!(layout.log_file, root.join("logs/mission_2026-01-02_03-04-05.log"));
        assert_eq!(layout.cumulative_log, root.join("logs/missions.log"));
    }

    #[test]
    fn timestamp_uses_configured_zone() {
        let layout = MissionLayout::new(
            &settings(Path::new(".")),
            &clock("2026-12-31T23:59:59Z"),
            Timezone::parse(Some("Europe/Paris")).unwrap(),
        );
        assert_eq!(layout.timestamp, "2027-01-01_00-59-59");
    }

    #[test]
    fn prepare_creates_nested_dirs_and_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let layout = MissionLayout::for_timestamp(
            &LayoutSettings {
                missions_dir: dir.path().join("deep/missions"),
                logs_dir: dir.path().join("deep/logs"),
                cumulative_log: "missions.log".to_string(),
            },
            "2026-05-05_10-00-00".to_string(),
        );
        layout.prepare().unwrap();
        layout.prepare().unwrap();
        assert!(layout.output_dir.is_dir());
        assert!(layout.logs_dir.is_dir());
        assert!(!layout.log_file.exists());
    }

    #[test]
    fn prepare_reports_the_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("missions");
        fs::write(&blocker, "not a directory").unwrap();
        let layout = MissionLayout::for_timestamp(&settings(dir.path()), "ts".to_string());

        let err = layout.prepare().unwrap_err();
        match err {
            LaunchError::CreateDir { path, .. } => assert_eq!(path, layout.output_dir),
            other => panic!("unexpected error: {other}"),
        }
    }
}
