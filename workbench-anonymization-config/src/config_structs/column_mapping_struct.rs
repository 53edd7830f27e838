use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The privacy role a column plays in the dataset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnRole {
    Identifier,
    QuasiIdentifier,
    Sensitive,
    #[default]
    NonSensitive,
}

impl ColumnRole {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::Identifier => "Identifier",
            ColumnRole::QuasiIdentifier => "Quasi-identifier",
            ColumnRole::Sensitive => "Sensitive",
            ColumnRole::NonSensitive => "Non-sensitive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ColumnRole::Identifier => "Direct identifiers (ID, email, SSN), removed entirely",
            ColumnRole::QuasiIdentifier => {
                "Can identify a person when combined (age, postal code, gender)"
            }
            ColumnRole::Sensitive => "Private information (salary, medical condition)",
            ColumnRole::NonSensitive => "Public information",
        }
    }
}

impl Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Identifier => write!(f, "identifier"),
            ColumnRole::QuasiIdentifier => write!(f, "quasi-identifier"),
            ColumnRole::Sensitive => write!(f, "sensitive"),
            ColumnRole::NonSensitive => write!(f, "non-sensitive"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ColumnMapping {
    pub column: String,
    #[serde(rename = "type")]
    pub role: ColumnRole,
}

impl ColumnMapping {
    pub fn new(column: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            column: column.into(),
            role,
        }
    }
}
