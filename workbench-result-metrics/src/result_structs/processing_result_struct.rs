use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use workbench_anonymization_config::config_structs::dataset_struct::RowRecord;
use workbench_anonymization_config::wire_id::deserialize_id;

use super::technique_detail_struct::TechniqueDetail;

/// The outcome of one processing request, as produced by the engine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProcessingResult {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub dataset_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub config_id: String,
    #[serde(default)]
    pub metrics: Metrics,
    /// Keyed by the engine (`generalization_age`, `k_anonymity`, ...), in the
    /// order the engine reported them.
    #[serde(default)]
    pub technique_details: IndexMap<String, TechniqueDetail>,
    #[serde(default)]
    pub anonymized_data: Vec<RowRecord>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Metrics {
    pub k_anonymity: u64,
    pub l_diversity: f64,
    pub information_loss_percentage: f64,
    pub original_rows: u64,
    pub anonymized_rows: u64,
    pub original_columns: u64,
    pub anonymized_columns: u64,
    pub quasi_identifiers: Vec<String>,
    pub sensitive_attributes: Vec<String>,
}
