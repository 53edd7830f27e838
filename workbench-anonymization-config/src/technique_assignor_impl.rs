use tracing::debug;

use crate::config_error::ConfigError;
use crate::config_structs::column_mapping_struct::{ColumnMapping, ColumnRole};
use crate::config_structs::configuration_struct::ConfigurationDraft;
use crate::config_structs::technique_struct::{Technique, TechniqueAssignment, TechniqueParameters};

impl ConfigurationDraft {
    /// Columns that may carry a technique: every mapping whose role is not
    /// `identifier`, in dataset column order.
    pub fn assignable_columns(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.column_mappings
            .iter()
            .filter(|mapping| mapping.role != ColumnRole::Identifier)
    }

    /// Assigns a technique to a column, replacing any previous assignment.
    ///
    /// # Errors
    ///
    /// Fails when the column is not mapped, when it is an identifier, or when a
    /// parameter lies outside its domain. The draft is unchanged on failure.
    pub fn assign(
        &mut self,
        column: &str,
        parameters: TechniqueParameters,
    ) -> Result<(), ConfigError> {
        match self.role_of(column) {
            None => {
                return Err(ConfigError::UnknownColumn {
                    column: column.to_string(),
                });
            }
            Some(role @ ColumnRole::Identifier) => {
                return Err(ConfigError::IdentifierColumn {
                    column: column.to_string(),
                    role,
                });
            }
            Some(_) => {}
        }
        parameters.validate()?;

        debug!(
            column,
            technique = %parameters.technique(),
            "Assigning technique"
        );

        match self
            .techniques
            .iter_mut()
            .find(|assignment| assignment.column == column)
        {
            Some(existing) => existing.parameters = parameters,
            None => self
                .techniques
                .push(TechniqueAssignment::new(column, parameters)),
        }

        Ok(())
    }

    /// Assigns a technique with its default parameters.
    pub fn assign_default(&mut self, column: &str, technique: Technique) -> Result<(), ConfigError> {
        self.assign(column, technique.default_parameters())
    }

    pub fn lookup(&self, column: &str) -> Option<&TechniqueAssignment> {
        self.techniques
            .iter()
            .find(|assignment| assignment.column == column)
    }

    /// Removes the assignment of a column, returning it if there was one.
    pub fn clear_technique(&mut self, column: &str) -> Option<TechniqueAssignment> {
        let position = self
            .techniques
            .iter()
            .position(|assignment| assignment.column == column)?;
        Some(self.techniques.remove(position))
    }
}
