use crate::{
    error::{MenuSyncError, Result},
    settings::{ContextMenuScope, PreferenceSnapshot},
};

use super::{
    host::{settle_batch, HostCapabilities, Icon, MenuContext, MenuHost, MenuItemSpec},
    ids, labels,
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const FIRST_ANONYMOUS_ID: u32 = 10_000;

/// Contexts the static entries are bound to for a given scope preference.
struct ScopeContexts {
    /// Main actions: manage, restore submenu, fill.
    actions: Vec<MenuContext>,
    /// Separators and secondary entries, never on the button menus.
    secondary: Vec<MenuContext>,
    /// "Clear fields": secondary contexts plus the toolbar button.
    secondary_and_toolbar: Vec<MenuContext>,
}

impl ScopeContexts {
    fn for_scope(scope: ContextMenuScope) -> Self {
        use MenuContext::*;
        match scope {
            ContextMenuScope::Page => Self {
                actions: vec![All],
                secondary: vec![Page],
                secondary_and_toolbar: vec![BrowserAction, Page],
            },
            ContextMenuScope::EditableFieldsOnly => Self {
                actions: vec![Frame, BrowserAction, PageAction, Editable],
                secondary: vec![Editable],
                secondary_and_toolbar: vec![BrowserAction, Editable],
            },
            // Secondary entries get no context and are not created.
            ContextMenuScope::Everywhere => Self {
                actions: vec![Frame, BrowserAction, PageAction],
                secondary: Vec::new(),
                secondary_and_toolbar: vec![BrowserAction],
            },
        }
    }
}

/// A button menu with a cap on visible top-level entries.
#[derive(Debug, Clone, Copy)]
struct SurfaceBudget {
    surface: MenuContext,
    limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Direct,
    Overflow,
}

/// Builds the static menus: tools menu, right-click menu and the button-menu
/// overflow tree. Remembers what it created so a preference change can rebuild.
#[derive(Debug)]
pub struct MenuCatalog {
    capabilities: HostCapabilities,
    budgets: [SurfaceBudget; 2],
    live_ids: Vec<String>,
    anonymous_seq: u32,
}

impl MenuCatalog {
    pub fn new(
        capabilities: HostCapabilities,
        browser_action_limit: usize,
        page_action_limit: usize,
    ) -> Self {
        Self {
            capabilities,
            budgets: [
                SurfaceBudget {
                    surface: MenuContext::BrowserAction,
                    limit: browser_action_limit,
                },
                SurfaceBudget {
                    surface: MenuContext::PageAction,
                    limit: page_action_limit,
                },
            ],
            live_ids: Vec::new(),
            anonymous_seq: FIRST_ANONYMOUS_ID,
        }
    }

    /// Ids of right-click and button-menu items currently created.
    pub fn live_ids(&self) -> &[String] {
        &self.live_ids
    }

    pub fn tools_menu_items() -> Vec<MenuItemSpec> {
        let tools = [MenuContext::ToolsMenu];
        vec![
            MenuItemSpec::item(ids::TOOLS_PARENT, labels::EXTENSION_NAME, &tools)
                .with_icon(Icon::Extension),
            MenuItemSpec::item(ids::MANAGE_TOOLS, labels::MANAGE_HISTORY, &tools)
                .child_of(ids::TOOLS_PARENT)
                .with_icon(Icon::Extension),
            MenuItemSpec::item(ids::OPTIONS_TOOLS, labels::OPTIONS, &tools)
                .child_of(ids::TOOLS_PARENT)
                .with_icon(Icon::Preferences),
        ]
    }

    /// The right-click menu for `scope`. Separators get fresh anonymous ids.
    pub fn context_menu_items(&mut self, scope: ContextMenuScope) -> Vec<MenuItemSpec> {
        let ctx = ScopeContexts::for_scope(scope);
        let mut items = vec![
            MenuItemSpec::item(ids::MANAGE, labels::MANAGE_HISTORY, &ctx.actions)
                .with_icon(Icon::Extension),
            self.separator(&ctx.secondary),
            MenuItemSpec::item(ids::RESTORE_SUBMENU, labels::RESTORE_EDITOR_FIELD, &ctx.actions)
                .with_icon(Icon::Refresh),
            self.separator(&ctx.secondary),
            MenuItemSpec::item(ids::FILL_MOST_RECENT, labels::FILL_MOST_RECENT, &ctx.actions)
                .with_icon(Icon::FillFields),
            MenuItemSpec::item(ids::FILL_MOST_USED, labels::FILL_MOST_USED, &ctx.actions)
                .with_icon(Icon::FillFields),
            MenuItemSpec::item(ids::CLEAR_FIELDS, labels::CLEAR_FIELDS, &ctx.secondary_and_toolbar)
                .with_icon(Icon::EmptyFields),
            self.separator(&ctx.secondary),
            MenuItemSpec::item(ids::SHOW_FORM_FIELDS, labels::SHOW_FORM_FIELDS, &ctx.secondary)
                .with_icon(Icon::ShowFields),
            self.separator(&ctx.secondary),
            MenuItemSpec::item(ids::INFO_SUBMENU, labels::INFO_SUBMENU, &ctx.secondary)
                .with_icon(Icon::Submenu),
        ];
        for (id, title, icon) in [
            (ids::HELP_OVERVIEW, labels::HELP_OVERVIEW, Icon::Help),
            (ids::RELEASE_NOTES, labels::RELEASE_NOTES, Icon::ReleaseNotes),
            (ids::ABOUT, labels::ABOUT, Icon::About),
        ] {
            items.push(
                MenuItemSpec::item(id, title, &ctx.secondary)
                    .child_of(ids::INFO_SUBMENU)
                    .with_icon(icon),
            );
        }
        items.push(self.separator(&ctx.secondary));
        items.push(
            MenuItemSpec::item(ids::PREFERENCES, labels::OPTIONS, &ctx.secondary)
                .with_icon(Icon::Preferences),
        );
        items
    }

    /// Copies of the right-click entries a button menu cannot reach. Entries fit into
    /// whatever top-level room the budget leaves; when they do not all fit, one slot
    /// becomes the overflow submenu and the rest move under it.
    pub fn action_surface_items(&mut self, context_items: &[MenuItemSpec]) -> Vec<MenuItemSpec> {
        let leaves = actionable_leaves(context_items);
        let mut placements: Vec<Vec<(MenuContext, Placement)>> = vec![Vec::new(); leaves.len()];

        for budget in self.budgets {
            let visible = context_items
                .iter()
                .filter(|item| {
                    item.parent_id.is_none() && !item.is_separator() && item.shows_on(budget.surface)
                })
                .count();
            let hidden: Vec<usize> = leaves
                .iter()
                .enumerate()
                .filter(|(_, (_, item))| !reachable_on(item, context_items, budget.surface))
                .map(|(index, _)| index)
                .collect();
            if hidden.is_empty() {
                continue;
            }

            let room = budget.limit.saturating_sub(visible);
            let direct = if hidden.len() <= room {
                hidden.len()
            } else {
                room.saturating_sub(1)
            };
            if hidden.len() > room && room == 0 {
                log_warn!(
                    "{:?} menu already shows {} entries, overflow exceeds the limit of {}",
                    budget.surface,
                    visible,
                    budget.limit
                );
            }
            for (position, index) in hidden.into_iter().enumerate() {
                let placement = if position < direct {
                    Placement::Direct
                } else {
                    Placement::Overflow
                };
                placements[index].push((budget.surface, placement));
            }
        }

        let surfaces_for = |index: usize, wanted: Placement| -> Vec<MenuContext> {
            placements[index]
                .iter()
                .filter(|(_, placement)| *placement == wanted)
                .map(|(surface, _)| *surface)
                .collect()
        };

        let mut items = Vec::new();
        for (index, (_, item)) in leaves.iter().enumerate() {
            let surfaces = surfaces_for(index, Placement::Direct);
            if !surfaces.is_empty() {
                items.push(copy_entry(item, ids::DIRECT_SUFFIX, &surfaces, None));
            }
        }

        let overflow_surfaces: Vec<MenuContext> = self
            .budgets
            .iter()
            .map(|budget| budget.surface)
            .filter(|surface| {
                placements
                    .iter()
                    .any(|entry| entry.contains(&(*surface, Placement::Overflow)))
            })
            .collect();
        if overflow_surfaces.is_empty() {
            return items;
        }

        items.push(
            MenuItemSpec::item(ids::OVERFLOW_SUBMENU, labels::MORE, &overflow_surfaces)
                .with_icon(Icon::Submenu),
        );
        let mut last_group = None;
        for (index, (group, item)) in leaves.iter().enumerate() {
            let surfaces = surfaces_for(index, Placement::Overflow);
            if surfaces.is_empty() {
                continue;
            }
            if last_group.is_some_and(|last| last != *group) {
                let separator = self.separator(&overflow_surfaces);
                items.push(separator.child_of(ids::OVERFLOW_SUBMENU));
            }
            last_group = Some(*group);
            items.push(copy_entry(
                item,
                ids::OVERFLOW_SUFFIX,
                &surfaces,
                Some(ids::OVERFLOW_SUBMENU),
            ));
        }

        items
    }

    /// Startup: tools menu, right-click menu and button menus.
    pub async fn build(&mut self, host: &dyn MenuHost, prefs: &PreferenceSnapshot) -> Result<usize> {
        let tools = self.create_items(host, Self::tools_menu_items(), false).await?;
        let tracked = self.create_tracked_tree(host, prefs.context_menu_scope).await?;
        log_info!(
            "static menus built ({} tools entries, {} context entries, scope {:?})",
            tools,
            tracked,
            prefs.context_menu_scope
        );
        Ok(tools + tracked)
    }

    /// Preference change: drop every right-click and button-menu entry, then build
    /// them again for the new scope. The tools menu does not depend on the scope.
    pub async fn rebuild(&mut self, host: &dyn MenuHost, prefs: &PreferenceSnapshot) -> Result<usize> {
        let previous = std::mem::take(&mut self.live_ids);
        let removals = previous
            .iter()
            .map(|id| (id.clone(), host.remove(id)))
            .collect::<Vec<_>>();

        let mut unreachable = None;
        for (id, outcome) in settle_batch(removals).await {
            match outcome {
                Ok(()) => {}
                Err(MenuSyncError::HostUnreachable(message)) => {
                    self.live_ids.push(id);
                    unreachable.get_or_insert(message);
                }
                Err(err) => log_warn!("removing menu item {id} failed: {err}"),
            }
        }
        if let Some(message) = unreachable {
            return Err(MenuSyncError::HostUnreachable(message));
        }

        let created = self.create_tracked_tree(host, prefs.context_menu_scope).await?;
        log_info!(
            "context menu rebuilt with {} entries for scope {:?}",
            created,
            prefs.context_menu_scope
        );
        Ok(created)
    }

    async fn create_tracked_tree(&mut self, host: &dyn MenuHost, scope: ContextMenuScope) -> Result<usize> {
        let context_items = self.context_menu_items(scope);
        let surface_items = self.action_surface_items(&context_items);
        let mut items = context_items;
        items.extend(surface_items);
        self.create_items(host, items, true).await
    }

    async fn create_items(
        &mut self,
        host: &dyn MenuHost,
        items: Vec<MenuItemSpec>,
        track: bool,
    ) -> Result<usize> {
        let calls = items
            .into_iter()
            .filter_map(|item| self.capabilities.adapt(item))
            .map(|item| (item.id.clone(), host.create(item)))
            .collect::<Vec<_>>();

        let mut created = 0;
        let mut unreachable = None;
        for (id, outcome) in settle_batch(calls).await {
            match outcome {
                Ok(_) => {
                    created += 1;
                    if track {
                        self.live_ids.push(id);
                    }
                }
                Err(MenuSyncError::HostUnreachable(message)) => {
                    unreachable.get_or_insert(message);
                }
                Err(err) => log_warn!("creating menu item {id} failed: {err}"),
            }
        }
        match unreachable {
            Some(message) => Err(MenuSyncError::HostUnreachable(message)),
            None => Ok(created),
        }
    }

    fn separator(&mut self, contexts: &[MenuContext]) -> MenuItemSpec {
        self.anonymous_seq += 1;
        MenuItemSpec::separator(ids::anonymous_id(self.anonymous_seq), contexts)
    }
}

/// Entries that do something when clicked, tagged with the separator group they
/// sit in. Submenu parents (and the dynamic restore submenu) are not actions.
fn actionable_leaves(items: &[MenuItemSpec]) -> Vec<(usize, &MenuItemSpec)> {
    let mut group = 0;
    let mut leaves = Vec::new();
    for item in items {
        if item.is_separator() {
            if item.parent_id.is_none() {
                group += 1;
            }
            continue;
        }
        let is_parent = item.id == ids::RESTORE_SUBMENU
            || items
                .iter()
                .any(|other| other.parent_id.as_deref() == Some(item.id.as_str()));
        if !is_parent {
            leaves.push((group, item));
        }
    }
    leaves
}

/// Whether the item's top-level ancestor shows on `surface`.
fn reachable_on(item: &MenuItemSpec, items: &[MenuItemSpec], surface: MenuContext) -> bool {
    let mut current = item;
    // Bounded walk; menus nest at most a few levels.
    for _ in 0..items.len() {
        let Some(parent_id) = current.parent_id.as_deref() else {
            return current.shows_on(surface);
        };
        match items.iter().find(|candidate| candidate.id == parent_id) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

fn copy_entry(
    item: &MenuItemSpec,
    suffix: &str,
    surfaces: &[MenuContext],
    parent: Option<&str>,
) -> MenuItemSpec {
    let mut copy = item.clone();
    copy.id = format!("{}{}", item.id, suffix);
    copy.parent_id = parent.map(str::to_string);
    copy.contexts = surfaces.to_vec();
    copy
}
