//! Mission launching
//!
//! A mission is one run of the external controller: a timestamped output
//! directory, a timestamped log file, and optionally lines in the cumulative log.

pub(crate) mod env;
pub(crate) mod launcher;
pub(crate) mod layout;
pub(crate) mod records;
pub(crate) mod tee;

pub(crate) use env::{EnvSettings, plan_env};
pub(crate) use launcher::{LaunchSettings, exit_code, launch};
pub(crate) use layout::{LayoutSettings, MissionLayout};
pub(crate) use records::{MissionRecord, find_records};
