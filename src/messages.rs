//! Message shapes exchanged with the content scripts and the options page.

use serde::{Deserialize, Serialize};

/// `eventType` the options page sends when the menu scope preference changed.
pub const CONTEXT_MENU_AVAIL_EVENT: u32 = 888;

/// Runtime message broadcast by the options page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contextmenu_avail_changed: Option<bool>,
}

impl ContextEvent {
    pub fn menu_scope_changed() -> Self {
        Self {
            event_type: Some(CONTEXT_MENU_AVAIL_EVENT),
            contextmenu_avail_changed: Some(true),
        }
    }

    pub fn requests_menu_rebuild(&self) -> bool {
        self.event_type == Some(CONTEXT_MENU_AVAIL_EVENT)
            && self.contextmenu_avail_changed.unwrap_or(false)
    }
}

/// Payloads sent to the content collaborator in a tab. Fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum ContentMessage {
    #[serde(rename = "showformfields")]
    ShowFormFields {
        #[serde(rename = "targetTabId")]
        target_tab_id: i64,
    },
    #[serde(rename = "fillMostRecent")]
    FillMostRecent {
        #[serde(rename = "targetTabId")]
        target_tab_id: i64,
    },
    #[serde(rename = "fillMostUsed")]
    FillMostUsed {
        #[serde(rename = "targetTabId")]
        target_tab_id: i64,
    },
    #[serde(rename = "clearFields")]
    ClearFields {
        #[serde(rename = "targetTabId")]
        target_tab_id: i64,
    },
    #[serde(rename = "formfieldValueResponseSingle")]
    FormfieldValueResponseSingle {
        id: String,
        name: String,
        #[serde(rename = "nodeName")]
        node_name: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillAction {
    MostRecent,
    MostUsed,
    Clear,
}

impl FillAction {
    pub fn message_for(self, tab_id: i64) -> ContentMessage {
        match self {
            FillAction::MostRecent => ContentMessage::FillMostRecent {
                target_tab_id: tab_id,
            },
            FillAction::MostUsed => ContentMessage::FillMostUsed {
                target_tab_id: tab_id,
            },
            FillAction::Clear => ContentMessage::ClearFields {
                target_tab_id: tab_id,
            },
        }
    }
}

/// Extension pages opened (or focused when already open) from the menus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionView {
    Manage,
    Options,
    About,
    Help,
    ReleaseNotes,
}

/// Keyboard commands declared by the extension manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    OpenManager,
    ToggleDisplayFields,
    FillRecent,
    FillOften,
    ClearFilled,
}

impl ShortcutCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "open_fhc" => Some(Self::OpenManager),
            "toggle_display_fields" => Some(Self::ToggleDisplayFields),
            "fill_recent" => Some(Self::FillRecent),
            "fill_often" => Some(Self::FillOften),
            "clear_filled" => Some(Self::ClearFilled),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OpenManager => "open_fhc",
            Self::ToggleDisplayFields => "toggle_display_fields",
            Self::FillRecent => "fill_recent",
            Self::FillOften => "fill_often",
            Self::ClearFilled => "clear_filled",
        }
    }

    /// Preference key that switches this shortcut on or off.
    pub fn enable_key(self) -> &'static str {
        match self {
            Self::OpenManager => "open_fhc_enable",
            Self::ToggleDisplayFields => "toggle_display_fields_enable",
            Self::FillRecent => "fill_recent_enable",
            Self::FillOften => "fill_often_enable",
            Self::ClearFilled => "clear_filled_enable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_messages_use_wire_names() {
        let fill = serde_json::to_value(FillAction::MostUsed.message_for(7)).unwrap();
        assert_eq!(fill, json!({"action": "fillMostUsed", "targetTabId": 7}));

        let single = ContentMessage::FormfieldValueResponseSingle {
            id: String::new(),
            name: "comment".into(),
            node_name: "textarea".into(),
            value: "hello".into(),
        };
        assert_eq!(
            serde_json::to_value(single).unwrap(),
            json!({
                "action": "formfieldValueResponseSingle",
                "id": "",
                "name": "comment",
                "nodeName": "textarea",
                "value": "hello"
            })
        );
    }

    #[test]
    fn only_the_scope_event_requests_a_rebuild() {
        let event: ContextEvent =
            serde_json::from_value(json!({"eventType": 888, "contextmenuAvailChanged": true}))
                .unwrap();
        assert!(event.requests_menu_rebuild());

        let other: ContextEvent = serde_json::from_value(json!({"eventType": 777})).unwrap();
        assert!(!other.requests_menu_rebuild());
    }

    #[test]
    fn shortcut_names_map_both_ways() {
        for name in ["open_fhc", "toggle_display_fields", "fill_recent", "fill_often", "clear_filled"] {
            let command = ShortcutCommand::parse(name).unwrap();
            assert_eq!(command.name(), name);
            assert_eq!(command.enable_key(), format!("{name}_enable"));
        }
        assert!(ShortcutCommand::parse("unknown").is_none());
    }
}
