//! Wires the host events to the menu code: activation events feed the debounced
//! restore-submenu refresh, clicks and shortcuts become content messages or opened
//! views, and a scope change rebuilds the static menus.

pub mod events;
pub mod pipeline;

use std::sync::Arc;

use tokio::{sync::Mutex, time};
use tokio_util::sync::CancellationToken;

use crate::{
    activation::{ActivationKey, ActivationTracker, DebounceGate, RetryPolicy, TabTarget},
    config::EngineConfig,
    db::ValueStore,
    error::Result,
    menu::{resolve_menu_action, MenuAction, MenuCatalog, MenuDiffEngine, MenuHost, TabHost, TabStatus},
    messages::{ContentMessage, ExtensionView, FillAction, ShortcutCommand},
    settings::SettingsStore,
};

pub use events::BrowserEvent;
pub use pipeline::RefreshPipeline;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

struct MenuSyncInner {
    config: EngineConfig,
    menus: Arc<dyn MenuHost>,
    tabs: Arc<dyn TabHost>,
    store: Arc<dyn ValueStore>,
    settings: Arc<SettingsStore>,
    tracker: Arc<ActivationTracker>,
    pipeline: Arc<RefreshPipeline>,
    catalog: Mutex<MenuCatalog>,
    gate: DebounceGate<TabTarget>,
    shutdown: CancellationToken,
}

#[derive(Clone)]
pub struct MenuSync {
    inner: Arc<MenuSyncInner>,
}

impl MenuSync {
    pub fn new(
        config: EngineConfig,
        menus: Arc<dyn MenuHost>,
        tabs: Arc<dyn TabHost>,
        store: Arc<dyn ValueStore>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let capabilities = config.surface.capabilities();
        let tracker = Arc::new(ActivationTracker::new(
            Arc::clone(&tabs),
            RetryPolicy::from_config(&config),
        ));
        let pipeline = Arc::new(RefreshPipeline::new(
            Arc::clone(&store),
            Arc::clone(&menus),
            MenuDiffEngine::new(capabilities),
            config.candidate_limit,
        ));

        let gate = {
            let tracker = Arc::clone(&tracker);
            let pipeline = Arc::clone(&pipeline);
            DebounceGate::new(config.refresh_debounce, move |target: TabTarget| {
                let tracker = Arc::clone(&tracker);
                let pipeline = Arc::clone(&pipeline);
                async move { refresh_for(&tracker, &pipeline, target).await }
            })
        };

        let catalog = MenuCatalog::new(
            capabilities,
            config.browser_action_limit,
            config.page_action_limit,
        );

        Self {
            inner: Arc::new(MenuSyncInner {
                config,
                menus,
                tabs,
                store,
                settings,
                tracker,
                pipeline,
                catalog: Mutex::new(catalog),
                gate,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Build the static menus, then schedule the first restore-submenu refresh for
    /// the active tab once the startup delay has passed.
    pub async fn start(&self) -> Result<()> {
        let prefs = self.inner.settings.snapshot();
        self.inner
            .catalog
            .lock()
            .await
            .build(self.inner.menus.as_ref(), &prefs)
            .await?;

        let sync = self.clone();
        let delay = self.inner.config.startup_delay;
        let token = self.inner.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = time::sleep(delay) => {
                    if let Err(err) = sync.follow_active_tab().await {
                        log_warn!("initial restore menu refresh skipped: {err}");
                    }
                }
            }
        });
        Ok(())
    }

    /// Stop scheduling refreshes. Cycles already running finish on their own.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.gate.cancel();
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    pub async fn handle_event(&self, event: BrowserEvent) -> Result<()> {
        if self.inner.shutdown.is_cancelled() {
            return Ok(());
        }
        match event {
            BrowserEvent::WindowFocusChanged { window_id } => self.on_window_focus(window_id).await,
            BrowserEvent::TabActivated { tab_id, .. } => self.on_tab_activated(tab_id).await,
            BrowserEvent::TabUpdated { tab_id, status } => {
                if status == Some(TabStatus::Complete) {
                    self.on_tab_activated(tab_id).await
                } else {
                    Ok(())
                }
            }
            BrowserEvent::MenuClicked {
                menu_item_id,
                tab_id,
            } => self.on_menu_clicked(&menu_item_id, tab_id).await,
            BrowserEvent::Command { name } => self.on_command(&name).await,
            BrowserEvent::RuntimeMessage(message) => {
                if message.requests_menu_rebuild() {
                    self.rebuild_menus().await
                } else {
                    Ok(())
                }
            }
        }
    }

    pub async fn on_window_focus(&self, window_id: i64) -> Result<()> {
        if window_id <= 0 {
            return Ok(());
        }
        self.follow_active_tab().await
    }

    pub async fn on_tab_activated(&self, tab_id: i64) -> Result<()> {
        let target = self.inner.tracker.target_for_tab(tab_id).await?;
        self.inner.gate.trigger(target);
        Ok(())
    }

    pub async fn on_menu_clicked(&self, item_id: &str, tab_id: Option<i64>) -> Result<()> {
        let action = resolve_menu_action(item_id)?;
        log_debug!("menu item {} clicked -> {:?}", item_id, action);
        self.perform(action, tab_id).await
    }

    pub async fn on_command(&self, name: &str) -> Result<()> {
        let Some(command) = ShortcutCommand::parse(name) else {
            log_debug!("ignoring unknown command '{name}'");
            return Ok(());
        };
        if !self.inner.settings.snapshot().shortcut_enabled(command) {
            log_debug!("shortcut '{}' is disabled", command.name());
            return Ok(());
        }

        let action = match command {
            ShortcutCommand::OpenManager => MenuAction::Open(ExtensionView::Manage),
            ShortcutCommand::ToggleDisplayFields => MenuAction::ShowFormFields,
            ShortcutCommand::FillRecent => MenuAction::Fill(FillAction::MostRecent),
            ShortcutCommand::FillOften => MenuAction::Fill(FillAction::MostUsed),
            ShortcutCommand::ClearFilled => MenuAction::Fill(FillAction::Clear),
        };
        let tab_id = match action {
            MenuAction::Open(_) => None,
            _ => self
                .inner
                .tracker
                .active_target()
                .await?
                .map(|target| target.tab_id),
        };
        self.perform(action, tab_id).await
    }

    /// The scope preference changed: drop and rebuild the right-click and button
    /// menus, then rebuild the restore submenu for the active tab from scratch.
    pub async fn rebuild_menus(&self) -> Result<()> {
        if let Err(err) = self.inner.settings.reload() {
            log_warn!("keeping previous preferences, reload failed: {err:#}");
        }
        let prefs = self.inner.settings.snapshot();

        self.inner.gate.cancel();
        // A running cycle finishes under the old parent before it is removed.
        let mut diff = self.inner.pipeline.exclusive().await;
        self.inner
            .catalog
            .lock()
            .await
            .rebuild(self.inner.menus.as_ref(), &prefs)
            .await?;

        // The restore submenu went away with its parent.
        diff.forget_all();
        drop(diff);
        self.inner.tracker.reset();
        log_info!("menus rebuilt for scope {:?}", prefs.context_menu_scope);

        self.follow_active_tab().await
    }

    pub fn current_key(&self) -> ActivationKey {
        self.inner.tracker.current_key()
    }

    /// Ids currently shown in the restore submenu.
    pub async fn restore_menu_ids(&self) -> Vec<String> {
        self.inner.pipeline.live_ids().await
    }

    async fn follow_active_tab(&self) -> Result<()> {
        match self.inner.tracker.active_target().await? {
            Some(target) => self.inner.gate.trigger(target),
            None => log_debug!("focused window has no active tab"),
        }
        Ok(())
    }

    async fn perform(&self, action: MenuAction, tab_id: Option<i64>) -> Result<()> {
        let tabs = &self.inner.tabs;
        match (action, tab_id) {
            (MenuAction::Ignore, _) => Ok(()),
            (MenuAction::Open(view), _) => tabs.open_view(view).await,
            (MenuAction::Fill(fill), Some(tab_id)) => {
                tabs.send_message(tab_id, fill.message_for(tab_id)).await
            }
            (MenuAction::ShowFormFields, Some(tab_id)) => {
                tabs.send_message(
                    tab_id,
                    ContentMessage::ShowFormFields {
                        target_tab_id: tab_id,
                    },
                )
                .await
            }
            (MenuAction::RestoreValue(primary_key), Some(tab_id)) => {
                self.restore_value(primary_key, tab_id).await
            }
            (action, None) => {
                log_debug!("{:?} needs a tab, none available", action);
                Ok(())
            }
        }
    }

    async fn restore_value(&self, primary_key: i64, tab_id: i64) -> Result<()> {
        let Some(record) = self.inner.store.get_by_primary_key(primary_key).await? else {
            log_debug!("stored value {primary_key} no longer exists");
            return Ok(());
        };
        let message = ContentMessage::FormfieldValueResponseSingle {
            id: String::new(),
            name: record.field_name,
            node_name: record.field_kind.node_name().to_string(),
            value: record.value,
        };
        self.inner.tabs.send_message(tab_id, message).await
    }
}

async fn refresh_for(tracker: &ActivationTracker, pipeline: &RefreshPipeline, target: TabTarget) {
    let Some(key) = tracker.commit(&target) else {
        return;
    };
    if let Err(err) = pipeline.refresh(&key.domain).await {
        log_warn!("restore menu refresh for '{}' failed: {err}", key.domain);
        // Let the next activation of this tab try again.
        tracker.reset();
    }
}
