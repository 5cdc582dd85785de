//! Menu item ids. Click dispatch decodes the same ids the builders create, so
//! every id that carries data goes through the helpers here.

use crate::selector::SourceKind;

pub const TOOLS_PARENT: &str = "FHCToolsParentMenu";
pub const MANAGE_TOOLS: &str = "manageTools";
pub const OPTIONS_TOOLS: &str = "optionsTools";

pub const MANAGE: &str = "manage";
pub const RESTORE_SUBMENU: &str = "restoreEditorField";
pub const FILL_MOST_RECENT: &str = "fillMostRecent";
pub const FILL_MOST_USED: &str = "fillMostUsed";
pub const CLEAR_FIELDS: &str = "clearFields";
pub const SHOW_FORM_FIELDS: &str = "showformfields";
pub const INFO_SUBMENU: &str = "submenuInfo";
pub const HELP_OVERVIEW: &str = "helpoverview";
pub const RELEASE_NOTES: &str = "releasenotes";
pub const ABOUT: &str = "about";
pub const PREFERENCES: &str = "preferences";

/// Overflow submenu on the toolbar/address-bar button menus.
pub const OVERFLOW_SUBMENU: &str = "submenuExtra";
/// Suffix of entries copied under [`OVERFLOW_SUBMENU`].
pub const OVERFLOW_SUFFIX: &str = "BA";
/// Suffix of entries copied straight onto a button menu's top level.
pub const DIRECT_SUFFIX: &str = "Action";

/// Prefix shared by everything in the restore submenu.
pub const VALUE_PREFIX: &str = "editfld";
pub const DOMAIN_HEADER: &str = "editfldhostname";
pub const RECENT_HEADER: &str = "editfldlastused";
pub const MORE_SEPARATOR: &str = "editfldMoreSeparator";
pub const MORE: &str = "editfldMore";

const ANONYMOUS_PREFIX: &str = "noname";

pub fn header_id(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::DomainMatch => DOMAIN_HEADER,
        SourceKind::RecencyMatch => RECENT_HEADER,
    }
}

pub fn value_item_id(primary_key: i64) -> String {
    format!("{VALUE_PREFIX}{primary_key}")
}

/// Inverse of [`value_item_id`]. Headers and the "more" entries share the prefix
/// but are not numeric, so they yield `None`.
pub fn primary_key_from_item_id(id: &str) -> Option<i64> {
    let digits = id.strip_prefix(VALUE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn anonymous_id(sequence: u32) -> String {
    format!("{ANONYMOUS_PREFIX}{sequence}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_ids_round_trip() {
        assert_eq!(value_item_id(12), "editfld12");
        assert_eq!(primary_key_from_item_id("editfld12"), Some(12));
    }

    #[test]
    fn non_value_ids_are_not_primary_keys() {
        for id in [DOMAIN_HEADER, RECENT_HEADER, MORE, MORE_SEPARATOR, "editfld", "manage", "editfld-4"] {
            assert_eq!(primary_key_from_item_id(id), None, "{id}");
        }
    }
}
