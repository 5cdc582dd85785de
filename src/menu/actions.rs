use crate::{
    error::{MenuSyncError, Result},
    messages::{ExtensionView, FillAction},
};

use super::ids;

/// What a click on a menu item asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open(ExtensionView),
    Fill(FillAction),
    ShowFormFields,
    /// Put the stored value with this primary key back into the focused field.
    RestoreValue(i64),
    /// Submenu parents and disabled headers; nothing to do.
    Ignore,
}

/// Decode a clicked item id. Copies on the button menus carry a suffix and act like
/// the entry they were copied from.
pub fn resolve_menu_action(item_id: &str) -> Result<MenuAction> {
    if let Some(primary_key) = ids::primary_key_from_item_id(item_id) {
        return Ok(MenuAction::RestoreValue(primary_key));
    }

    let base = item_id
        .strip_suffix(ids::OVERFLOW_SUFFIX)
        .or_else(|| item_id.strip_suffix(ids::DIRECT_SUFFIX))
        .unwrap_or(item_id);

    let action = match base {
        ids::MANAGE | ids::MANAGE_TOOLS | ids::MORE => MenuAction::Open(ExtensionView::Manage),
        ids::PREFERENCES | ids::OPTIONS_TOOLS => MenuAction::Open(ExtensionView::Options),
        ids::ABOUT => MenuAction::Open(ExtensionView::About),
        ids::HELP_OVERVIEW => MenuAction::Open(ExtensionView::Help),
        ids::RELEASE_NOTES => MenuAction::Open(ExtensionView::ReleaseNotes),
        ids::FILL_MOST_RECENT => MenuAction::Fill(FillAction::MostRecent),
        ids::FILL_MOST_USED => MenuAction::Fill(FillAction::MostUsed),
        ids::CLEAR_FIELDS => MenuAction::Fill(FillAction::Clear),
        ids::SHOW_FORM_FIELDS => MenuAction::ShowFormFields,
        ids::TOOLS_PARENT
        | ids::RESTORE_SUBMENU
        | ids::INFO_SUBMENU
        | ids::OVERFLOW_SUBMENU
        | ids::DOMAIN_HEADER
        | ids::RECENT_HEADER => MenuAction::Ignore,
        _ => return Err(MenuSyncError::UnknownMenuAction(item_id.to_string())),
    };
    Ok(action)
}
