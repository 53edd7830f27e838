use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The engine's account of one transformation it applied.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TechniqueDetail {
    pub technique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub changes: Vec<String>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_k: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_k: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_l: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_attribute: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quasi_identifiers: Vec<String>,
}
