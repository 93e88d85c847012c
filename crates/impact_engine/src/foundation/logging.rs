//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system for a binary.
pub fn init() {
    env_logger::init();
}

/// Initialize logging where a logger may already be installed (tests, tools).
pub fn try_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
