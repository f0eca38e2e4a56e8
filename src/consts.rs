/// Timestamp embedded in mission directory and log file names: "2025-01-15_09-30-00"
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Human-readable timestamp used in cumulative log announcements
pub(crate) const ANNOUNCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) const DEFAULT_LOGS_DIR: &str = "logs";
pub(crate) const DEFAULT_MISSIONS_DIR: &str = "missions";
pub(crate) const DEFAULT_CUMULATIVE_LOG: &str = "missions.log";
pub(crate) const DEFAULT_DISPLAY: &str = ":0";

pub(crate) const MISSION_DIR_PREFIX: &str = "mission_record_";
pub(crate) const MISSION_LOG_PREFIX: &str = "mission_";

pub(crate) const DEFAULT_TAIL_LINES: usize = 100;
