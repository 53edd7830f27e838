use std::collections::HashSet;

use tracing::debug;

use crate::config_structs::column_mapping_struct::{ColumnMapping, ColumnRole};
use crate::config_structs::configuration_struct::ConfigurationDraft;
use crate::config_structs::dataset_struct::Dataset;

pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Seeds one mapping per dataset column, every column starting as
    /// `non-sensitive`. A repeated column name keeps its first occurrence only.
    pub fn classify(dataset: &Dataset) -> Vec<ColumnMapping> {
        let mut seen = HashSet::new();

        dataset
            .column_names
            .iter()
            .filter(|column| seen.insert(column.as_str()))
            .map(|column| ColumnMapping::new(column.as_str(), ColumnRole::default()))
            .collect()
    }
}

impl ConfigurationDraft {
    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        self.column_mappings
            .iter()
            .find(|mapping| mapping.column == column)
            .map(|mapping| mapping.role)
    }

    /// Changes the role of a mapped column and returns the previous role.
    ///
    /// Moving a column to `identifier` also removes its technique assignment,
    /// since the engine drops identifier columns entirely. Unknown columns are
    /// left alone and yield `None`.
    pub fn set_role(&mut self, column: &str, role: ColumnRole) -> Option<ColumnRole> {
        let mapping = self
            .column_mappings
            .iter_mut()
            .find(|mapping| mapping.column == column)?;

        let previous = std::mem::replace(&mut mapping.role, role);

        if role == ColumnRole::Identifier {
            let before = self.techniques.len();
            self.techniques.retain(|assignment| assignment.column != column);
            if self.techniques.len() != before {
                debug!("Cleared technique of column {column} reclassified as identifier");
            }
        }

        Some(previous)
    }
}
