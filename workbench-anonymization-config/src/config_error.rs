use thiserror::Error;

use crate::config_structs::column_mapping_struct::ColumnRole;

/// Local validation failures raised while editing or submitting a configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The column is not part of the dataset this configuration belongs to.
    #[error("column '{column}' does not exist in the dataset")]
    UnknownColumn { column: String },

    /// Identifier columns are dropped by the engine and never carry a technique.
    #[error("column '{column}' is classified as {role} and cannot carry a technique")]
    IdentifierColumn { column: String, role: ColumnRole },

    #[error("{parameter} must be within {domain}, got {value}")]
    ParameterOutOfRange {
        parameter: &'static str,
        domain: &'static str,
        value: String,
    },

    #[error("please provide a configuration name")]
    EmptyName,

    /// The mapped columns do not match the dataset columns one to one.
    #[error("column mappings do not match the dataset columns (missing: {missing:?}, unexpected: {unexpected:?})")]
    MappingMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(
        parameter: &'static str,
        domain: &'static str,
        value: impl ToString,
    ) -> Self {
        ConfigError::ParameterOutOfRange {
            parameter,
            domain,
            value: value.to_string(),
        }
    }
}
