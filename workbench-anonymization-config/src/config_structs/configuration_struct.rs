use bon::Builder;
use serde::{Deserialize, Serialize};

use super::column_mapping_struct::ColumnMapping;
use super::global_params_struct::GlobalParameters;
use super::technique_struct::TechniqueAssignment;
use crate::wire_id::deserialize_id;

/// The editable configuration of a single dataset.
///
/// Construction goes through `ConfigurationDraft::for_dataset`, which seeds one
/// mapping per dataset column; the editing operations live in the
/// `column_classifier_impl`, `technique_assignor_impl` and
/// `configuration_draft_impl` modules.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationDraft {
    pub(crate) dataset_id: String,
    pub(crate) dataset_name: String,
    pub(crate) dataset_columns: Vec<String>,
    pub(crate) name: String,
    pub(crate) column_mappings: Vec<ColumnMapping>,
    pub(crate) techniques: Vec<TechniqueAssignment>,
    pub(crate) global_params: GlobalParameters,
}

/// Body of `POST /configs`.
#[derive(Serialize, Clone, Debug, PartialEq, Builder)]
pub struct ConfigurationPayload {
    #[builder(into)]
    pub dataset_id: String,
    #[builder(into)]
    pub name: String,
    pub column_mappings: Vec<ColumnMapping>,
    pub techniques: Vec<TechniqueAssignment>,
    pub global_params: GlobalParameters,
}

/// A configuration as stored by the engine, identified by its server id.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct PersistedConfiguration {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub dataset_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub column_mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub techniques: Vec<TechniqueAssignment>,
    #[serde(default)]
    pub global_params: GlobalParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
