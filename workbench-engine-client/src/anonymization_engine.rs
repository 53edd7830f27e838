use std::path::Path;

use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};
use workbench_anonymization_config::config_structs::configuration_struct::{
    ConfigurationPayload, PersistedConfiguration,
};
use workbench_anonymization_config::config_structs::dataset_struct::Dataset;
use workbench_result_metrics::result_structs::processing_result_struct::ProcessingResult;

use crate::engine_error::EngineError;

/// Body of `POST /process`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
pub struct ProcessRequest {
    #[builder(into)]
    pub dataset_id: String,
    #[builder(into)]
    pub config_id: String,
}

/// Aggregate counters reported by `GET /stats`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EngineStats {
    pub total_datasets: u64,
    pub total_configs: u64,
    pub total_results: u64,
    pub total_rows_processed: u64,
    pub avg_processing_time_ms: f64,
}

/// The request/response boundary to the external anonymization engine.
#[async_trait]
pub trait AnonymizationEngine: Send + Sync {
    /// Base address every request is sent to, used in connectivity messages.
    fn base_url(&self) -> &str;

    async fn list_datasets(&self) -> Result<Vec<Dataset>, EngineError>;

    async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, EngineError>;

    async fn upload_dataset(&self, path: &Path) -> Result<Dataset, EngineError>;

    async fn create_config(
        &self,
        payload: &ConfigurationPayload,
    ) -> Result<PersistedConfiguration, EngineError>;

    async fn list_configs(
        &self,
        dataset_id: Option<&str>,
    ) -> Result<Vec<PersistedConfiguration>, EngineError>;

    async fn process(&self, request: &ProcessRequest) -> Result<ProcessingResult, EngineError>;

    async fn list_results(
        &self,
        dataset_id: Option<&str>,
    ) -> Result<Vec<ProcessingResult>, EngineError>;

    async fn get_result(&self, result_id: &str) -> Result<ProcessingResult, EngineError>;

    async fn stats(&self) -> Result<EngineStats, EngineError>;
}
