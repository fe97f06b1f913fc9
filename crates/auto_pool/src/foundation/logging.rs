//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Reads the filter from `RUST_LOG`. Panics if a logger is already installed;
/// use [`try_init`] from tests or hosts that may have set one up already.
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring an already-installed logger
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
