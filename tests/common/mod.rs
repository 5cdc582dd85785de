#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use formfield_menu_lib::{
    config::EngineConfig,
    db::{FieldKind, FieldRecord, ValueStore},
    error::{MenuSyncError, Result},
    menu::{ids, HostCall, HostSurface, MenuHost, MenuItemSpec, TabHost, TabInfo, TabStatus},
    messages::{ContentMessage, ExtensionView},
    selector::display_value,
    settings::{PreferenceSnapshot, SettingsStore},
    sync::MenuSync,
};
use tempfile::TempDir;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCall {
    Create(String),
    Remove(String),
}

/// In-memory menu host. Mirrors the browser: duplicate creates and removals of
/// unknown ids are rejected, removing a parent removes its children.
#[derive(Default)]
pub struct FakeMenuHost {
    calls: Mutex<Vec<MenuCall>>,
    items: Arc<Mutex<HashMap<String, MenuItemSpec>>>,
    unreachable: AtomicBool,
    held: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeMenuHost {
    /// Keep restore-submenu creates pending until [`Self::release_restore_items`].
    pub fn hold_restore_items(&self) {
        *self.held.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_restore_items(&self) {
        if let Some(gate) = self.held.lock().unwrap().take() {
            gate.add_permits(1024);
        }
    }

    pub fn calls(&self) -> Vec<MenuCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items.lock().unwrap().contains_key(id)
    }

    pub fn item(&self, id: &str) -> Option<MenuItemSpec> {
        self.items.lock().unwrap().get(id).cloned()
    }

    /// Ids of the children of `parent`, sorted.
    pub fn children_of(&self, parent: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.parent_id.as_deref() == Some(parent))
            .map(|item| item.id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn item_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn removed_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MenuCall::Remove(id) => Some(id),
                MenuCall::Create(_) => None,
            })
            .collect()
    }

    pub fn created_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MenuCall::Create(id) => Some(id),
                MenuCall::Remove(_) => None,
            })
            .collect()
    }

    fn unreachable_error(&self) -> Option<MenuSyncError> {
        self.unreachable
            .load(Ordering::SeqCst)
            .then(|| MenuSyncError::HostUnreachable("menus API gone".into()))
    }
}

impl MenuHost for FakeMenuHost {
    fn create(&self, item: MenuItemSpec) -> HostCall<String> {
        self.calls.lock().unwrap().push(MenuCall::Create(item.id.clone()));
        if let Some(err) = self.unreachable_error() {
            return Box::pin(async move { Err(err) });
        }
        let held = if item.id.starts_with(ids::VALUE_PREFIX) {
            self.held.lock().unwrap().clone()
        } else {
            None
        };
        match held {
            Some(gate) => {
                let items = Arc::clone(&self.items);
                Box::pin(async move {
                    let _permit = gate.acquire().await;
                    insert_item(&items, item)
                })
            }
            None => {
                let outcome = insert_item(&self.items, item);
                Box::pin(async move { outcome })
            }
        }
    }

    fn remove(&self, id: &str) -> HostCall<()> {
        self.calls.lock().unwrap().push(MenuCall::Remove(id.to_string()));
        let outcome = match self.unreachable_error() {
            Some(err) => Err(err),
            None => {
                let mut items = self.items.lock().unwrap();
                if items.remove(id).is_none() {
                    Err(MenuSyncError::HostApi {
                        id: id.to_string(),
                        message: format!("Cannot find menu item with id {id}"),
                    })
                } else {
                    let mut parents = vec![id.to_string()];
                    while let Some(parent) = parents.pop() {
                        let children: Vec<String> = items
                            .values()
                            .filter(|item| item.parent_id.as_deref() == Some(parent.as_str()))
                            .map(|item| item.id.clone())
                            .collect();
                        for child in children {
                            items.remove(&child);
                            parents.push(child);
                        }
                    }
                    Ok(())
                }
            }
        };
        Box::pin(async move { outcome })
    }
}

fn insert_item(items: &Mutex<HashMap<String, MenuItemSpec>>, item: MenuItemSpec) -> Result<String> {
    let mut items = items.lock().unwrap();
    if items.contains_key(&item.id) {
        return Err(MenuSyncError::HostApi {
            id: item.id.clone(),
            message: "duplicate id".into(),
        });
    }
    let id = item.id.clone();
    items.insert(id.clone(), item);
    Ok(id)
}

/// In-memory tabs of a single focused window.
#[derive(Default)]
pub struct FakeTabs {
    tabs: Mutex<HashMap<i64, TabInfo>>,
    lookups: AtomicUsize,
    sent: Mutex<Vec<(i64, ContentMessage)>>,
    opened: Mutex<Vec<ExtensionView>>,
}

impl FakeTabs {
    pub fn put(&self, tab: TabInfo) {
        if tab.active {
            for other in self.tabs.lock().unwrap().values_mut() {
                if other.window_id == tab.window_id {
                    other.active = false;
                }
            }
        }
        self.tabs.lock().unwrap().insert(tab.id, tab);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(i64, ContentMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<ExtensionView> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabHost for FakeTabs {
    async fn get_tab(&self, tab_id: i64) -> Result<TabInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.tabs
            .lock()
            .unwrap()
            .get(&tab_id)
            .cloned()
            .ok_or_else(|| MenuSyncError::HostApi {
                id: format!("tab {tab_id}"),
                message: "no such tab".into(),
            })
    }

    async fn current_window_tabs(&self) -> Result<Vec<TabInfo>> {
        let mut tabs: Vec<TabInfo> = self.tabs.lock().unwrap().values().cloned().collect();
        tabs.sort_by_key(|tab| tab.id);
        Ok(tabs)
    }

    async fn send_message(&self, tab_id: i64, message: ContentMessage) -> Result<()> {
        self.sent.lock().unwrap().push((tab_id, message));
        Ok(())
    }

    async fn open_view(&self, view: ExtensionView) -> Result<()> {
        self.opened.lock().unwrap().push(view);
        Ok(())
    }
}

/// Value store over a plain vector, with the same filtering and ordering as the
/// SQLite store. Counts queries so tests can tell how many refreshes ran.
#[derive(Default)]
pub struct FakeStore {
    records: Mutex<Vec<FieldRecord>>,
    domain_queries: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn with_records(records: Vec<FieldRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn domain_queries(&self) -> Vec<String> {
        self.domain_queries.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MenuSyncError::StoreUnavailable("disk I/O error".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ValueStore for FakeStore {
    async fn query_by_domain(&self, domain: &str, limit: usize) -> Result<Vec<FieldRecord>> {
        self.domain_queries.lock().unwrap().push(domain.to_string());
        self.check()?;
        if domain.is_empty() {
            return Ok(Vec::new());
        }
        let mut matches: Vec<FieldRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| {
                record.domain == domain && !record.field_kind.is_input() && !is_blank(record)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.last_used
                .cmp(&a.last_used)
                .then_with(|| a.field_name.to_lowercase().cmp(&b.field_name.to_lowercase()))
        });
        matches.truncate(limit);
        Ok(matches)
    }

    async fn query_by_recency(
        &self,
        domain: &str,
        limit: usize,
        excluded: &HashSet<i64>,
    ) -> Result<Vec<FieldRecord>> {
        self.check()?;
        let mut all: Vec<FieldRecord> = self.records.lock().unwrap().clone();
        all.sort_by(|a, b| {
            b.last_used
                .cmp(&a.last_used)
                .then_with(|| b.primary_key.cmp(&a.primary_key))
        });
        Ok(all
            .into_iter()
            .filter(|record| {
                !record.field_kind.is_input()
                    && record.domain != domain
                    && !excluded.contains(&record.primary_key)
                    && !is_blank(record)
            })
            .take(limit)
            .collect())
    }

    async fn get_by_primary_key(&self, primary_key: i64) -> Result<Option<FieldRecord>> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.primary_key == primary_key)
            .cloned())
    }
}

fn is_blank(record: &FieldRecord) -> bool {
    display_value(&record.value).is_empty()
}

pub fn record(primary_key: i64, domain: &str, node_name: &str, value: &str, last_used: i64) -> FieldRecord {
    FieldRecord {
        primary_key,
        domain: domain.to_string(),
        field_kind: FieldKind::from_node_name(node_name),
        value: value.to_string(),
        last_used,
        field_name: format!("field{primary_key}"),
    }
}

pub fn tab(id: i64, window_id: i64, url: &str, status: TabStatus, active: bool) -> TabInfo {
    TabInfo {
        id,
        window_id,
        url: url.to_string(),
        status,
        active,
    }
}

pub fn test_config(data_dir: &TempDir) -> EngineConfig {
    EngineConfig {
        data_dir: data_dir.path().to_path_buf(),
        surface: HostSurface::Firefox,
        startup_delay: Duration::from_millis(1500),
        ..EngineConfig::default()
    }
}

/// A synchroniser over fakes, with its preferences file in a temp dir.
pub struct Harness {
    pub dir: TempDir,
    pub menus: Arc<FakeMenuHost>,
    pub tabs: Arc<FakeTabs>,
    pub store: Arc<FakeStore>,
    pub settings: Arc<SettingsStore>,
    pub sync: MenuSync,
}

impl Harness {
    pub fn new(records: Vec<FieldRecord>) -> Self {
        Self::on_surface(records, HostSurface::Firefox)
    }

    pub fn on_surface(records: Vec<FieldRecord>, surface: HostSurface) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config = EngineConfig {
            surface,
            ..test_config(&dir)
        };
        let menus = Arc::new(FakeMenuHost::default());
        let tabs = Arc::new(FakeTabs::default());
        let store = Arc::new(FakeStore::with_records(records));
        let settings = Arc::new(SettingsStore::new(config.settings_path()).expect("settings"));
        let sync = MenuSync::new(
            config,
            menus.clone(),
            tabs.clone(),
            store.clone(),
            settings.clone(),
        );
        Self {
            dir,
            menus,
            tabs,
            store,
            settings,
            sync,
        }
    }
}

impl Harness {
    /// Write the preferences file the way the options page does. The synchroniser
    /// sees the change after a reload.
    pub fn write_preferences(&self, prefs: &PreferenceSnapshot) {
        let json = serde_json::to_string_pretty(prefs).expect("encode preferences");
        std::fs::write(self.dir.path().join("settings.json"), json).expect("write preferences");
    }
}

/// Let spawned tasks run without moving the paused clock far.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
