use std::{path::PathBuf, time::Duration};

use crate::menu::HostSurface;

/// Tunables for the synchroniser. Defaults match the browser extension's behaviour;
/// a few can be overridden through `FORMFIELD_MENU_*` environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum candidates per source (domain matches, recent matches).
    pub candidate_limit: usize,

    /// Quiet window before a burst of activation events turns into one refresh.
    pub refresh_debounce: Duration,

    /// One-shot delay before the first refresh so the initial active tab can settle.
    pub startup_delay: Duration,

    /// Navigation polling while a tab is still loading.
    pub navigation_retry_delay: Duration,
    pub navigation_max_attempts: u32,

    /// Maximum visible top-level items on the toolbar button menu.
    pub browser_action_limit: usize,
    /// Same for the address-bar button menu.
    pub page_action_limit: usize,

    pub data_dir: PathBuf,
    pub surface: HostSurface,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 10,
            refresh_debounce: Duration::from_millis(250),
            startup_delay: Duration::from_millis(1500),
            navigation_retry_delay: Duration::from_millis(500),
            navigation_max_attempts: 10,
            browser_action_limit: 6,
            page_action_limit: 5,
            data_dir: PathBuf::from(".formfield-menu"),
            surface: HostSurface::Firefox,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("FORMFIELD_MENU_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(surface) = std::env::var("FORMFIELD_MENU_SURFACE")
            .ok()
            .and_then(|value| HostSurface::parse(&value))
        {
            config.surface = surface;
        }

        if let Some(limit) = env_number("FORMFIELD_MENU_CANDIDATES") {
            config.candidate_limit = limit as usize;
        }

        if let Some(ms) = env_number("FORMFIELD_MENU_DEBOUNCE_MS") {
            config.refresh_debounce = Duration::from_millis(ms);
        }

        // Skip the startup settle delay when driving the host by hand.
        let fast_start = std::env::var("FORMFIELD_MENU_FAST_START")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if fast_start {
            config.startup_delay = Duration::ZERO;
        }

        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("formhistory.sqlite3")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

fn env_number(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse().ok()
}
