//! Logging macros gated by a module-level `ENABLE_LOGS` switch.
//!
//! Every module that logs through these declares the switch next to its constants:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("menu rebuilt with {} items", count);
//! ```
//! Output goes through the `log` facade, so `RUST_LOG` still filters by level and target.

/// Info-level log line, emitted only when the calling module has `ENABLE_LOGS` set.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Debug-level counterpart of [`log_info!`]. Used for per-event chatter
/// (suppressed duplicates, retries) that is too noisy for the default filter.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Errors are always worth seeing, but a module can still silence itself in tests.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
