use anyhow::Result;
use rusqlite::Row;

use crate::{
    db::models::{FieldKind, FieldRecord},
    selector::display_value,
};

pub const FIELD_RECORD_COLUMNS: &str = "pk, host, node_name, value, last_used, name";

/// Map a row selected with [`FIELD_RECORD_COLUMNS`].
pub fn row_to_field_record(row: &Row) -> Result<FieldRecord, rusqlite::Error> {
    let node_name: String = row.get("node_name")?;

    Ok(FieldRecord {
        primary_key: row.get("pk")?,
        domain: row.get("host")?,
        field_kind: FieldKind::from_node_name(&node_name),
        value: row.get("value")?,
        last_used: row.get("last_used")?,
        field_name: row.get("name")?,
    })
}

/// Whether the value still shows something once tags and whitespace are stripped.
/// Blank entries never count toward a query limit.
pub fn has_display_value(record: &FieldRecord) -> bool {
    !display_value(&record.value).is_empty()
}
