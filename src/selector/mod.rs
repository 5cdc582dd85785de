//! Picks the values offered in the restore submenu for a domain.
//!
//! Two sources are merged: entries recorded on the domain itself, then the globally
//! most recent entries from other domains. The merged order is the menu order.

pub mod sanitize;

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    db::{FieldRecord, ValueStore},
    error::Result,
};

pub use sanitize::{display_value, MAX_DISPLAY_CHARS};

/// Default number of candidates taken from each source.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    DomainMatch,
    RecencyMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub source_kind: SourceKind,
    pub primary_key: i64,
    pub last_used: i64,
    pub field_name: String,
    pub display_value: String,
}

impl Candidate {
    /// `None` when the value has nothing left to show after sanitizing.
    fn from_record(record: &FieldRecord, source_kind: SourceKind) -> Option<Self> {
        let display_value = display_value(&record.value);
        if display_value.is_empty() {
            return None;
        }
        Some(Self {
            source_kind,
            primary_key: record.primary_key,
            last_used: record.last_used,
            field_name: record.field_name.clone(),
            display_value,
        })
    }
}

/// Domain matches first (newest first), then recent entries from other domains that
/// were not already offered. At most `limit` of each.
pub async fn select_candidates(
    store: &dyn ValueStore,
    domain: &str,
    limit: usize,
) -> Result<Vec<Candidate>> {
    let by_domain = store.query_by_domain(domain, limit).await?;
    let offered: HashSet<i64> = by_domain.iter().map(|record| record.primary_key).collect();

    let by_recency = store.query_by_recency(domain, limit, &offered).await?;

    let candidates = by_domain
        .iter()
        .filter_map(|record| Candidate::from_record(record, SourceKind::DomainMatch))
        .chain(
            by_recency
                .iter()
                .filter(|record| !offered.contains(&record.primary_key))
                .filter_map(|record| Candidate::from_record(record, SourceKind::RecencyMatch)),
        )
        .collect();

    Ok(candidates)
}
