use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wire_id::deserialize_id;

/// A single row, keyed by column name in the order the engine returned it.
pub type RowRecord = IndexMap<String, Value>;

/// A dataset as owned by the storage collaborator. Read-only to the workbench.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub data: Vec<RowRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Dataset {
    /// Row count as reported by the engine, falling back to the rows carried along.
    pub fn rows(&self) -> u64 {
        self.row_count.unwrap_or(self.data.len() as u64)
    }

    pub fn columns(&self) -> u64 {
        self.column_count.unwrap_or(self.column_names.len() as u64)
    }
}
