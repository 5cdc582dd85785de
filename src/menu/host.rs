use std::{future::Future, pin::Pin};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::{
    error::{MenuSyncError, Result},
    messages::{ContentMessage, ExtensionView},
};

const ENABLE_LOGS: bool = true;

use crate::log_error;

/// A host call that has already been issued. Awaiting it only waits for the
/// host's answer, so a batch of calls reaches the host in the order they were made.
pub type HostCall<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Where a menu item is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    All,
    Page,
    Frame,
    Editable,
    Link,
    Selection,
    BrowserAction,
    PageAction,
    ToolsMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemType {
    Normal,
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Extension,
    FillFields,
    EmptyFields,
    ShowFields,
    Refresh,
    Submenu,
    Help,
    ReleaseNotes,
    About,
    Preferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSet {
    #[serde(rename = "16")]
    pub small: String,
    #[serde(rename = "32")]
    pub large: String,
}

impl From<Icon> for IconSet {
    fn from(icon: Icon) -> Self {
        let stem = match icon {
            Icon::Extension => {
                return Self {
                    small: "/theme/icons/fhc-16.png".into(),
                    large: "/theme/icons/fhc-32.png".into(),
                }
            }
            Icon::FillFields => "fillfields",
            Icon::EmptyFields => "emptyfields",
            Icon::ShowFields => "showfields",
            Icon::Refresh => "refresh",
            Icon::Submenu => "submenu",
            Icon::Help => "help",
            Icon::ReleaseNotes => "releasenotes",
            Icon::About => "about",
            Icon::Preferences => "preferences",
        };
        Self {
            small: format!("/theme/icons/menu/16/{stem}.png"),
            large: format!("/theme/icons/menu/32/{stem}.png"),
        }
    }
}

/// Properties of one menu item, in the shape the host menu API takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub contexts: Vec<MenuContext>,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub item_type: MenuItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<IconSet>,
}

impl MenuItemSpec {
    pub fn item(id: impl Into<String>, title: impl Into<String>, contexts: &[MenuContext]) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: Some(title.into()),
            contexts: contexts.to_vec(),
            enabled: true,
            item_type: MenuItemType::Normal,
            icons: None,
        }
    }

    pub fn separator(id: impl Into<String>, contexts: &[MenuContext]) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: None,
            contexts: contexts.to_vec(),
            enabled: true,
            item_type: MenuItemType::Separator,
            icons: None,
        }
    }

    pub fn child_of(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icons = Some(icon.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_separator(&self) -> bool {
        self.item_type == MenuItemType::Separator
    }

    /// Whether the host shows this item in `context`. `all` covers every
    /// context except the tools menu.
    pub fn shows_on(&self, context: MenuContext) -> bool {
        self.contexts.contains(&context)
            || (context != MenuContext::ToolsMenu && self.contexts.contains(&MenuContext::All))
    }
}

/// Browser family on the other end of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostSurface {
    Firefox,
    Chromium,
    Safari,
}

impl HostSurface {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "firefox" => Some(Self::Firefox),
            "chromium" | "chrome" | "edge" => Some(Self::Chromium),
            "safari" => Some(Self::Safari),
            _ => None,
        }
    }

    pub fn capabilities(self) -> HostCapabilities {
        match self {
            HostSurface::Firefox => HostCapabilities {
                icons: true,
                tools_menu: true,
            },
            HostSurface::Chromium | HostSurface::Safari => HostCapabilities {
                icons: false,
                tools_menu: false,
            },
        }
    }
}

/// Menu features the host supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub icons: bool,
    pub tools_menu: bool,
}

impl HostCapabilities {
    /// Fit an item to this host. Icons are dropped where unsupported; items that
    /// cannot be shown at all (no contexts, tools menu missing) yield `None`.
    pub fn adapt(&self, mut item: MenuItemSpec) -> Option<MenuItemSpec> {
        if item.contexts.is_empty() {
            return None;
        }
        if !self.tools_menu && item.contexts.contains(&MenuContext::ToolsMenu) {
            return None;
        }
        if !self.icons {
            item.icons = None;
        }
        Some(item)
    }
}

/// The host's menu API.
pub trait MenuHost: Send + Sync {
    /// Issue a create call; resolves to the id the host registered.
    fn create(&self, item: MenuItemSpec) -> HostCall<String>;

    /// Issue a remove call. Removing an id the host does not know is a `HostApi` error.
    fn remove(&self, id: &str) -> HostCall<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i64,
    pub window_id: i64,
    #[serde(default)]
    pub url: String,
    pub status: TabStatus,
    #[serde(default)]
    pub active: bool,
}

/// The host's tab and window API, plus the channels to content scripts and
/// extension pages.
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn get_tab(&self, tab_id: i64) -> Result<TabInfo>;

    /// Tabs of the window that currently has focus.
    async fn current_window_tabs(&self) -> Result<Vec<TabInfo>>;

    async fn send_message(&self, tab_id: i64, message: ContentMessage) -> Result<()>;

    /// Open an extension page, or focus it when it is already open.
    async fn open_view(&self, view: ExtensionView) -> Result<()>;
}

/// Wait for a batch of issued calls. Results come back in input order; one
/// failing call does not affect the others.
pub async fn settle_batch<T>(calls: Vec<(String, HostCall<T>)>) -> Vec<(String, Result<T>)>
where
    T: Send + 'static,
{
    let mut ids = Vec::with_capacity(calls.len());
    let mut pending = JoinSet::new();
    for (index, (id, call)) in calls.into_iter().enumerate() {
        ids.push(id);
        pending.spawn(async move { (index, call.await) });
    }

    let mut outcomes: Vec<Option<Result<T>>> = ids.iter().map(|_| None).collect();
    while let Some(joined) = pending.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(err) => log_error!("host call task failed: {err}"),
        }
    }

    ids.into_iter()
        .zip(outcomes)
        .map(|(id, outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                Err(MenuSyncError::HostApi {
                    id: id.clone(),
                    message: "call did not complete".into(),
                })
            });
            (id, outcome)
        })
        .collect()
}
