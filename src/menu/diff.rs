use std::collections::HashSet;

use chrono::{Local, TimeZone};

use crate::{
    error::{MenuSyncError, Result},
    selector::{Candidate, SourceKind},
};

use super::{
    host::{settle_batch, HostCapabilities, Icon, MenuContext, MenuHost, MenuItemSpec},
    ids, labels,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

const SUBMENU_CONTEXTS: &[MenuContext] = &[MenuContext::All];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    HeaderLabel,
    Separator,
    ValueItem,
    MoreLink,
}

/// An item this engine created in the restore submenu and has not removed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemRecord {
    pub id: String,
    pub parent_id: String,
    pub kind: MenuItemKind,
    pub source_candidate: Option<Candidate>,
}

/// One item of a submenu layout: what gets tracked and what gets sent to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub record: MenuItemRecord,
    pub spec: MenuItemSpec,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub removed: usize,
    pub created: usize,
    pub rejected: usize,
}

/// Owns the dynamic part of the restore submenu and keeps it equal to what the
/// host shows.
#[derive(Debug)]
pub struct MenuDiffEngine {
    live: Vec<MenuItemRecord>,
    capabilities: HostCapabilities,
}

impl MenuDiffEngine {
    pub fn new(capabilities: HostCapabilities) -> Self {
        Self {
            live: Vec::new(),
            capabilities,
        }
    }

    pub fn live_items(&self) -> &[MenuItemRecord] {
        &self.live
    }

    pub fn live_ids(&self) -> Vec<String> {
        self.live.iter().map(|record| record.id.clone()).collect()
    }

    /// Drop tracking without talking to the host; used after the host removed the
    /// whole restore submenu together with its parent.
    pub fn forget_all(&mut self) {
        self.live.clear();
    }

    /// Submenu layout for `candidates`: a header per source kind on its first
    /// occurrence, one entry per candidate, then a separator and the "more" link.
    pub fn layout(candidates: &[Candidate]) -> Vec<PlannedItem> {
        let mut planned = Vec::with_capacity(candidates.len() + 4);
        let mut headers = HashSet::new();

        for candidate in candidates {
            if headers.insert(candidate.source_kind) {
                planned.push(header(candidate.source_kind));
            }
            planned.push(value_entry(candidate));
        }

        if !candidates.is_empty() {
            planned.push(PlannedItem {
                record: record(ids::MORE_SEPARATOR, MenuItemKind::Separator, None),
                spec: MenuItemSpec::separator(ids::MORE_SEPARATOR, SUBMENU_CONTEXTS)
                    .child_of(ids::RESTORE_SUBMENU),
            });
            planned.push(PlannedItem {
                record: record(ids::MORE, MenuItemKind::MoreLink, None),
                spec: MenuItemSpec::item(ids::MORE, labels::MORE, SUBMENU_CONTEXTS)
                    .child_of(ids::RESTORE_SUBMENU)
                    .with_icon(Icon::Extension),
            });
        }

        planned
    }

    /// Replace the submenu contents with `candidates`. Every item from the previous
    /// cycle is removed before anything new is created; rejected calls are logged
    /// and skipped, an unreachable host aborts the cycle.
    pub async fn apply_candidates(
        &mut self,
        host: &dyn MenuHost,
        candidates: &[Candidate],
    ) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        let previous = std::mem::take(&mut self.live);
        let removals = previous
            .iter()
            .map(|item| (item.id.clone(), host.remove(&item.id)))
            .collect::<Vec<_>>();

        let mut unreachable = None;
        for ((id, outcome), item) in settle_batch(removals).await.into_iter().zip(previous) {
            match outcome {
                Ok(()) => report.removed += 1,
                Err(MenuSyncError::HostUnreachable(message)) => {
                    // Still on the host as far as we know; retry on the next cycle.
                    self.live.push(item);
                    unreachable.get_or_insert(message);
                }
                Err(err) => log_debug!("removal of {id} rejected, treating as gone: {err}"),
            }
        }
        if let Some(message) = unreachable {
            return Err(MenuSyncError::HostUnreachable(message));
        }

        let mut creations = Vec::new();
        let mut records = Vec::new();
        for PlannedItem { record, spec } in Self::layout(candidates) {
            let Some(spec) = self.capabilities.adapt(spec) else {
                continue;
            };
            creations.push((record.id.clone(), host.create(spec)));
            records.push(record);
        }

        for ((id, outcome), item) in settle_batch(creations).await.into_iter().zip(records) {
            match outcome {
                Ok(_) => {
                    self.live.push(item);
                    report.created += 1;
                }
                Err(MenuSyncError::HostUnreachable(message)) => {
                    unreachable.get_or_insert(message);
                }
                Err(err) => {
                    report.rejected += 1;
                    log_warn!("creating restore menu item {id} failed: {err}");
                }
            }
        }
        if let Some(message) = unreachable {
            return Err(MenuSyncError::HostUnreachable(message));
        }

        Ok(report)
    }
}

/// Short date shown in front of each value, in local time.
pub fn format_last_used(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).earliest() {
        Some(when) => when.format("%Y-%m-%d").to_string(),
        None => "????-??-??".to_string(),
    }
}

fn record(id: &str, kind: MenuItemKind, source: Option<Candidate>) -> MenuItemRecord {
    MenuItemRecord {
        id: id.to_string(),
        parent_id: ids::RESTORE_SUBMENU.to_string(),
        kind,
        source_candidate: source,
    }
}

fn header(kind: SourceKind) -> PlannedItem {
    let id = ids::header_id(kind);
    let label = match kind {
        SourceKind::DomainMatch => labels::RESTORE_HEADER_DOMAIN,
        SourceKind::RecencyMatch => labels::RESTORE_HEADER_RECENT,
    };
    PlannedItem {
        record: record(id, MenuItemKind::HeaderLabel, None),
        spec: MenuItemSpec::item(id, format!("--- {label}: ---"), SUBMENU_CONTEXTS)
            .child_of(ids::RESTORE_SUBMENU)
            .disabled(),
    }
}

fn value_entry(candidate: &Candidate) -> PlannedItem {
    let id = ids::value_item_id(candidate.primary_key);
    let title = format!(
        "[{}] {}",
        format_last_used(candidate.last_used),
        candidate.display_value
    );
    PlannedItem {
        spec: MenuItemSpec::item(id.as_str(), title, SUBMENU_CONTEXTS)
            .child_of(ids::RESTORE_SUBMENU)
            .with_icon(Icon::FillFields),
        record: record(&id, MenuItemKind::ValueItem, Some(candidate.clone())),
    }
}
