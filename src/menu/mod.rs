//! Menu construction: the static trees built at startup and the restore submenu
//! that follows the active tab.

pub mod actions;
pub mod catalog;
pub mod diff;
pub mod host;
pub mod ids;
pub mod labels;

pub use actions::{resolve_menu_action, MenuAction};
pub use catalog::MenuCatalog;
pub use diff::{format_last_used, CycleReport, MenuDiffEngine, MenuItemKind, MenuItemRecord};
pub use host::{
    settle_batch, HostCall, HostCapabilities, HostSurface, Icon, MenuContext, MenuHost,
    MenuItemSpec, MenuItemType, TabHost, TabInfo, TabStatus,
};
