use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::time;

use crate::{
    config::EngineConfig,
    error::{MenuSyncError, Result},
    menu::{TabHost, TabInfo, TabStatus},
};

use super::state::{is_extension_page, ActivationKey, TabTarget};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

const BLANK_PAGE: &str = "about:blank";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            delay: config.navigation_retry_delay,
            max_attempts: config.navigation_max_attempts.max(1),
        }
    }
}

/// Works out which tab the restore submenu should follow, and remembers which tab
/// it was last built for.
pub struct ActivationTracker {
    tabs: Arc<dyn TabHost>,
    retry: RetryPolicy,
    key: Mutex<ActivationKey>,
}

impl ActivationTracker {
    pub fn new(tabs: Arc<dyn TabHost>, retry: RetryPolicy) -> Self {
        Self {
            tabs,
            retry,
            key: Mutex::new(ActivationKey::default()),
        }
    }

    /// Resolve `tab_id` once it has finished navigating. A tab that is still loading,
    /// or still on the blank placeholder page, is polled again after the retry delay.
    pub async fn target_for_tab(&self, tab_id: i64) -> Result<TabTarget> {
        for attempt in 1..=self.retry.max_attempts {
            let tab = self.tabs.get_tab(tab_id).await?;
            if !still_navigating(&tab) {
                return Ok(target(&tab));
            }
            log_debug!(
                "tab {} still navigating (attempt {}/{})",
                tab_id,
                attempt,
                self.retry.max_attempts
            );
            if attempt < self.retry.max_attempts {
                time::sleep(self.retry.delay).await;
            }
        }
        Err(MenuSyncError::StaleNavigation {
            tab_id,
            attempts: self.retry.max_attempts,
        })
    }

    /// The active tab of the focused window, as the host reports it right now.
    pub async fn active_target(&self) -> Result<Option<TabTarget>> {
        let tabs = self.tabs.current_window_tabs().await?;
        Ok(tabs.iter().find(|tab| tab.active).map(target))
    }

    /// Record `target` as the tab the submenu now follows. Returns the new key, or
    /// `None` when nothing changed or the tab is one of the extension's own pages.
    pub fn commit(&self, target: &TabTarget) -> Option<ActivationKey> {
        if is_extension_page(&target.url) {
            log_debug!("ignoring extension page in tab {}", target.tab_id);
            return None;
        }

        let next = target.key();
        let mut current = self.lock_key();
        if *current == next {
            log_debug!(
                "skipping duplicate refresh for window {} tab {} ({})",
                next.window_id,
                next.tab_id,
                next.domain
            );
            return None;
        }
        *current = next.clone();
        Some(next)
    }

    pub fn current_key(&self) -> ActivationKey {
        self.lock_key().clone()
    }

    /// Forget the last key so the next activation always refreshes.
    pub fn reset(&self) {
        *self.lock_key() = ActivationKey::default();
    }

    fn lock_key(&self) -> MutexGuard<'_, ActivationKey> {
        match self.key.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn still_navigating(tab: &TabInfo) -> bool {
    tab.status == TabStatus::Loading || tab.url == BLANK_PAGE
}

fn target(tab: &TabInfo) -> TabTarget {
    TabTarget {
        window_id: tab.window_id,
        tab_id: tab.id,
        url: tab.url.clone(),
    }
}
