pub(crate) mod args;
pub(crate) mod commands;

pub(crate) use args::{Cli, SortOrder};
pub(crate) use commands::{Commands, LaunchArgs};
