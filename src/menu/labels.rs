//! Menu titles. Fixed English strings; translation happens on the browser side.

pub const EXTENSION_NAME: &str = "Form History Control";
pub const MANAGE_HISTORY: &str = "Manage form history";
pub const OPTIONS: &str = "Preferences";
pub const RESTORE_EDITOR_FIELD: &str = "Restore editor field";
pub const FILL_MOST_RECENT: &str = "Fill fields with most recent values";
pub const FILL_MOST_USED: &str = "Fill fields with most used values";
pub const CLEAR_FIELDS: &str = "Clear filled fields";
pub const SHOW_FORM_FIELDS: &str = "Show form fields";
pub const INFO_SUBMENU: &str = "Info";
pub const HELP_OVERVIEW: &str = "Help";
pub const RELEASE_NOTES: &str = "Release notes";
pub const ABOUT: &str = "About";
pub const MORE: &str = "More...";

pub const RESTORE_HEADER_DOMAIN: &str = "This website";
pub const RESTORE_HEADER_RECENT: &str = "Recently used";
