mod clean;
mod format;
mod runs;

pub(crate) use clean::{output_clean_json, print_clean_report};
pub(crate) use runs::{output_runs_json, print_runs_table};
