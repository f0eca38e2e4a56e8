//! Log directory housekeeping
//!
//! Truncating mission logs in place and reading back the cumulative log.

pub(crate) mod cleaner;
pub(crate) mod tail;

pub(crate) use cleaner::{CleanReport, clean_dir};
pub(crate) use tail::tail_lines;
