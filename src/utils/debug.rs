use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);

pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Print a diagnostic line to stderr when --debug is active
pub fn debug_log(msg: impl std::fmt::Display) {
    if debug_enabled() {
        eprintln!("[debug] {msg}");
    }
}
