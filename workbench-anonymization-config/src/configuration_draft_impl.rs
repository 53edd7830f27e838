use std::collections::HashSet;

use tracing::{debug, warn};

use crate::column_classifier_impl::ColumnClassifier;
use crate::config_error::ConfigError;
use crate::config_structs::column_mapping_struct::{ColumnMapping, ColumnRole};
use crate::config_structs::configuration_struct::{ConfigurationDraft, ConfigurationPayload};
use crate::config_structs::dataset_struct::Dataset;
use crate::config_structs::draft_record_struct::DraftRecord;
use crate::config_structs::global_params_struct::GlobalParameters;
use crate::config_structs::technique_struct::TechniqueAssignment;

impl ConfigurationDraft {
    /// Starts a fresh draft for a dataset: every column `non-sensitive`, no
    /// techniques, default global parameters.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let column_mappings = ColumnClassifier::classify(dataset);
        let dataset_columns = column_mappings
            .iter()
            .map(|mapping| mapping.column.clone())
            .collect();

        Self {
            dataset_id: dataset.id.clone(),
            dataset_name: dataset.name.clone(),
            dataset_columns,
            name: default_name(&dataset.name),
            column_mappings,
            techniques: Vec::new(),
            global_params: GlobalParameters::default(),
        }
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn column_mappings(&self) -> &[ColumnMapping] {
        &self.column_mappings
    }

    pub fn techniques(&self) -> &[TechniqueAssignment] {
        &self.techniques
    }

    pub fn global_params(&self) -> &GlobalParameters {
        &self.global_params
    }

    pub fn global_params_mut(&mut self) -> &mut GlobalParameters {
        &mut self.global_params
    }

    pub fn to_draft_record(&self) -> DraftRecord {
        DraftRecord {
            name: self.name.clone(),
            column_mappings: self.column_mappings.clone(),
            techniques: self.techniques.clone(),
            global_params: self.global_params,
        }
    }

    /// Overlays a saved draft on this draft.
    ///
    /// Saved roles only apply to columns the dataset still has, columns missing
    /// from the record keep their current role, and technique assignments that
    /// no longer fit (unknown column, identifier column) are dropped.
    pub fn apply_draft_record(&mut self, record: DraftRecord) {
        for mapping in &record.column_mappings {
            if self.set_role(&mapping.column, mapping.role).is_none() {
                debug!(
                    "Ignoring saved role of column {} missing from dataset {}",
                    mapping.column, self.dataset_id
                );
            }
        }

        self.techniques.clear();
        for assignment in record.techniques {
            if let Err(e) = self.assign(&assignment.column, assignment.parameters) {
                warn!("Dropping saved technique of column {}: {e}", assignment.column);
            }
        }

        self.global_params = record.global_params;

        if !record.name.trim().is_empty() {
            self.name = record.name;
        } else {
            self.name = default_name(&self.dataset_name);
        }
    }

    /// Checks completeness and domains before the configuration leaves the
    /// workbench. Navigation between wizard steps never calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let mapped: HashSet<&str> = self
            .column_mappings
            .iter()
            .map(|mapping| mapping.column.as_str())
            .collect();
        let expected: HashSet<&str> = self.dataset_columns.iter().map(String::as_str).collect();

        if mapped != expected || mapped.len() != self.column_mappings.len() {
            let mut missing: Vec<String> = expected
                .difference(&mapped)
                .map(|column| column.to_string())
                .collect();
            let mut unexpected: Vec<String> = mapped
                .difference(&expected)
                .map(|column| column.to_string())
                .collect();
            missing.sort();
            unexpected.sort();
            return Err(ConfigError::MappingMismatch {
                missing,
                unexpected,
            });
        }

        for assignment in &self.techniques {
            match self.role_of(&assignment.column) {
                None => {
                    return Err(ConfigError::UnknownColumn {
                        column: assignment.column.clone(),
                    });
                }
                Some(role @ ColumnRole::Identifier) => {
                    return Err(ConfigError::IdentifierColumn {
                        column: assignment.column.clone(),
                        role,
                    });
                }
                Some(_) => assignment.parameters.validate()?,
            }
        }

        Ok(())
    }

    /// Validates the draft and turns it into the body of `POST /configs`.
    pub fn to_payload(&self) -> Result<ConfigurationPayload, ConfigError> {
        self.validate()?;

        Ok(ConfigurationPayload::builder()
            .dataset_id(self.dataset_id.as_str())
            .name(self.name.trim())
            .column_mappings(self.column_mappings.clone())
            .techniques(self.techniques.clone())
            .global_params(self.global_params)
            .build())
    }
}

fn default_name(dataset_name: &str) -> String {
    format!("Config for {dataset_name}")
}
