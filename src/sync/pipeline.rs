use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    db::ValueStore,
    error::Result,
    menu::{CycleReport, MenuDiffEngine, MenuHost},
    selector::select_candidates,
};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// One refresh of the restore submenu: select candidates for a domain, then diff
/// them onto the host. Cycles run one at a time in the order they were started.
pub struct RefreshPipeline {
    store: Arc<dyn ValueStore>,
    menus: Arc<dyn MenuHost>,
    diff: Mutex<MenuDiffEngine>,
    candidate_limit: usize,
}

impl RefreshPipeline {
    pub fn new(
        store: Arc<dyn ValueStore>,
        menus: Arc<dyn MenuHost>,
        diff: MenuDiffEngine,
        candidate_limit: usize,
    ) -> Self {
        Self {
            store,
            menus,
            diff: Mutex::new(diff),
            candidate_limit,
        }
    }

    pub async fn refresh(&self, domain: &str) -> Result<CycleReport> {
        let mut diff = self.diff.lock().await;
        let candidates = select_candidates(self.store.as_ref(), domain, self.candidate_limit).await?;
        let report = diff.apply_candidates(self.menus.as_ref(), &candidates).await?;
        log_info!(
            "restore menu for '{}': {} candidates, {} removed, {} created, {} rejected",
            domain,
            candidates.len(),
            report.removed,
            report.created,
            report.rejected
        );
        Ok(report)
    }

    /// Hold off refresh cycles. Waits for a running cycle to finish first.
    pub async fn exclusive(&self) -> MutexGuard<'_, MenuDiffEngine> {
        self.diff.lock().await
    }

    pub async fn live_ids(&self) -> Vec<String> {
        self.diff.lock().await.live_ids()
    }
}
