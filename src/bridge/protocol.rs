use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    menu::MenuItemSpec,
    messages::{ContentMessage, ExtensionView},
    sync::BrowserEvent,
};

/// Frames the browser side sends to this process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Inbound {
    Event { event: BrowserEvent },

    /// Answer to a [`Outbound::Call`]. `error` is set when the browser API rejected it.
    #[serde(rename_all = "camelCase")]
    Reply {
        request_id: u64,
        #[serde(default)]
        result: Value,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Browser API invocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum HostMethod {
    MenusCreate(MenuItemSpec),
    MenusRemove {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    TabsGet {
        tab_id: i64,
    },
    WindowsCurrentTabs,
    #[serde(rename_all = "camelCase")]
    TabsSendMessage {
        tab_id: i64,
        message: ContentMessage,
    },
    OpenView {
        view: ExtensionView,
    },
}

/// Frames this process sends to the browser side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outbound {
    /// Expects a [`Inbound::Reply`] with the same request id.
    #[serde(rename_all = "camelCase")]
    Call {
        request_id: u64,
        #[serde(flatten)]
        method: HostMethod,
    },
    /// No reply expected.
    Notify {
        #[serde(flatten)]
        method: HostMethod,
    },
}
