use serde::{Deserialize, Serialize};

use super::column_mapping_struct::ColumnMapping;
use super::global_params_struct::GlobalParameters;
use super::technique_struct::TechniqueAssignment;

/// The in-progress configuration kept in the draft cache, one per dataset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub column_mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub techniques: Vec<TechniqueAssignment>,
    #[serde(default)]
    pub global_params: GlobalParameters,
}
