//! Recorded form field values.
//!
//! Rows are written by the content side whenever a text field is submitted; the menu
//! code only reads them.

use serde::{Deserialize, Serialize};

/// Kind of element a value was typed into. Single-line inputs are never offered
/// in the restore menu; everything else (textarea, contenteditable, iframe body)
/// is, and keeps its node name for the fill message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Input,
    Other(String),
}

impl FieldKind {
    pub fn from_node_name(node_name: &str) -> Self {
        if node_name.eq_ignore_ascii_case("input") {
            FieldKind::Input
        } else {
            FieldKind::Other(node_name.to_ascii_lowercase())
        }
    }

    pub fn node_name(&self) -> &str {
        match self {
            FieldKind::Input => "input",
            FieldKind::Other(name) => name,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, FieldKind::Input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub primary_key: i64,
    pub domain: String,
    pub field_kind: FieldKind,
    pub value: String,
    /// Epoch milliseconds.
    pub last_used: i64,
    pub field_name: String,
}

/// Values for a row about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFieldRecord {
    pub domain: String,
    pub field_kind: FieldKind,
    pub value: String,
    pub last_used: i64,
    pub field_name: String,
}
