//! Following the active tab: which tab and domain the restore submenu belongs to,
//! and the debounce that turns bursts of tab events into a single refresh.

pub mod debounce;
pub mod state;
pub mod tracker;

pub use debounce::DebounceGate;
pub use state::{hostname_from_url, is_extension_page, ActivationKey, TabTarget};
pub use tracker::{ActivationTracker, RetryPolicy};
