use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::messages::ShortcutCommand;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Where the right-click menu entries show up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ContextMenuScope {
    /// Plain page context (the browser default).
    #[default]
    Page,
    /// Only when right-clicking an editable field.
    #[serde(alias = "editfields")]
    EditableFieldsOnly,
    /// Frames and the toolbar buttons; secondary entries only on the button menus.
    Everywhere,
}

/// Preferences the menu code reads. Loaded at startup and re-read on the
/// "context menu availability changed" notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    #[serde(default)]
    pub context_menu_scope: ContextMenuScope,
    /// `<command>_enable` → enabled. Missing keys count as enabled.
    #[serde(default)]
    pub shortcut_keys: BTreeMap<String, bool>,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            context_menu_scope: ContextMenuScope::Page,
            shortcut_keys: BTreeMap::new(),
        }
    }
}

impl PreferenceSnapshot {
    pub fn shortcut_enabled(&self, command: ShortcutCommand) -> bool {
        self.shortcut_keys
            .get(command.enable_key())
            .copied()
            .unwrap_or(true)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PreferenceSnapshot>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log_warn!(
                        "Ignoring unreadable settings file {}: {err}",
                        path.display()
                    );
                    PreferenceSnapshot::default()
                }
            }
        } else {
            PreferenceSnapshot::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        self.read().clone()
    }

    /// Re-read the file after another process (the options page) changed it.
    pub fn reload(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: PreferenceSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, PreferenceSnapshot> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, PreferenceSnapshot> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_scope_value_is_accepted() {
        let parsed: PreferenceSnapshot =
            serde_json::from_str(r#"{"contextMenuScope":"editfields"}"#).unwrap();
        assert_eq!(parsed.context_menu_scope, ContextMenuScope::EditableFieldsOnly);
        assert!(parsed.shortcut_enabled(ShortcutCommand::FillRecent));
    }

    #[test]
    fn reload_picks_up_changes_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.snapshot(), PreferenceSnapshot::default());

        fs::write(
            &path,
            r#"{"contextMenuScope":"everywhere","shortcutKeys":{"clear_filled_enable":false}}"#,
        )
        .unwrap();
        store.reload().unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.context_menu_scope, ContextMenuScope::Everywhere);
        assert!(!snapshot.shortcut_enabled(ShortcutCommand::ClearFilled));
        assert!(snapshot.shortcut_enabled(ShortcutCommand::OpenManager));
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults_but_reload_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.snapshot(), PreferenceSnapshot::default());
        assert!(store.reload().is_err());
    }
}
