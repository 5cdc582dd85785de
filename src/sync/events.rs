use serde::{Deserialize, Serialize};

use crate::{menu::TabStatus, messages::ContextEvent};

/// Browser-side notifications the synchroniser reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BrowserEvent {
    /// `window_id` is zero or negative when focus left the browser.
    #[serde(rename_all = "camelCase")]
    WindowFocusChanged { window_id: i64 },

    #[serde(rename_all = "camelCase")]
    TabActivated { tab_id: i64, window_id: i64 },

    #[serde(rename_all = "camelCase")]
    TabUpdated {
        tab_id: i64,
        #[serde(default)]
        status: Option<TabStatus>,
    },

    #[serde(rename_all = "camelCase")]
    MenuClicked {
        menu_item_id: String,
        /// Tab the menu was opened on; absent for tools-menu clicks without a page.
        #[serde(default)]
        tab_id: Option<i64>,
    },

    Command { name: String },

    /// A runtime message from one of the extension pages.
    RuntimeMessage(ContextEvent),
}
