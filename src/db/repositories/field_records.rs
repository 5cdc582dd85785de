use std::collections::HashSet;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::db::{
    connection::Database,
    helpers::{has_display_value, row_to_field_record, FIELD_RECORD_COLUMNS},
    models::{FieldRecord, NewFieldRecord},
};

impl Database {
    /// Record a submitted field value and return the stored row.
    pub async fn record_field_value(&self, entry: NewFieldRecord) -> Result<FieldRecord> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO text_entries (name, node_name, value, host, used, first_used, last_used)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
                params![
                    entry.field_name,
                    entry.field_kind.node_name(),
                    entry.value,
                    entry.domain,
                    entry.last_used,
                ],
            )
            .with_context(|| "failed to insert text entry")?;

            Ok(FieldRecord {
                primary_key: conn.last_insert_rowid(),
                domain: entry.domain,
                field_kind: entry.field_kind,
                value: entry.value,
                last_used: entry.last_used,
                field_name: entry.field_name,
            })
        })
        .await
    }

    pub async fn get_field_record(&self, primary_key: i64) -> Result<Option<FieldRecord>> {
        self.execute(move |conn| {
            let query = format!("SELECT {FIELD_RECORD_COLUMNS} FROM text_entries WHERE pk = ?1");
            let record = conn
                .query_row(&query, params![primary_key], row_to_field_record)
                .optional()
                .with_context(|| format!("failed to load text entry {primary_key}"))?;
            Ok(record)
        })
        .await
    }

    /// Non-input entries recorded on `domain`, newest first, ties broken by field name.
    /// Entries with nothing to show are skipped before counting toward `limit`.
    pub async fn field_records_for_domain(
        &self,
        domain: &str,
        limit: usize,
    ) -> Result<Vec<FieldRecord>> {
        let domain = domain.to_string();
        self.execute(move |conn| {
            let mut accepted = Vec::new();
            if limit == 0 {
                return Ok(accepted);
            }

            let query = format!(
                "SELECT {FIELD_RECORD_COLUMNS}
                 FROM text_entries
                 WHERE host = ?1 AND lower(node_name) != 'input'
                 ORDER BY last_used DESC, name COLLATE NOCASE ASC"
            );
            let mut stmt = conn.prepare(&query)?;
            let mut rows = stmt.query(params![domain])?;
            while let Some(row) = rows.next()? {
                let record = row_to_field_record(row)?;
                if !has_display_value(&record) {
                    continue;
                }
                accepted.push(record);
                if accepted.len() >= limit {
                    break;
                }
            }
            Ok(accepted)
        })
        .await
    }

    /// Walk the last-used index newest-first (equal timestamps by primary key, newest
    /// first) and keep the first `limit` non-input, non-blank entries that are neither
    /// on `domain` nor listed in `excluded`.
    pub async fn recent_field_records(
        &self,
        domain: &str,
        limit: usize,
        excluded: HashSet<i64>,
    ) -> Result<Vec<FieldRecord>> {
        let domain = domain.to_string();
        self.execute(move |conn| {
            let mut accepted = Vec::new();
            if limit == 0 {
                return Ok(accepted);
            }

            let query = format!(
                "SELECT {FIELD_RECORD_COLUMNS}
                 FROM text_entries
                 ORDER BY last_used DESC, pk DESC"
            );
            let mut stmt = conn.prepare(&query)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let record = row_to_field_record(row)?;
                if record.field_kind.is_input()
                    || record.domain == domain
                    || excluded.contains(&record.primary_key)
                    || !has_display_value(&record)
                {
                    continue;
                }
                accepted.push(record);
                if accepted.len() >= limit {
                    break;
                }
            }
            Ok(accepted)
        })
        .await
    }
}
