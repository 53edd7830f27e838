//! REST client for the anonymization engine.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use workbench_anonymization_config::config_structs::configuration_struct::{
    ConfigurationPayload, PersistedConfiguration,
};
use workbench_anonymization_config::config_structs::dataset_struct::Dataset;
use workbench_app_settings::settings_structs::AppSettings;
use workbench_result_metrics::result_structs::processing_result_struct::ProcessingResult;

use crate::anonymization_engine::{AnonymizationEngine, EngineStats, ProcessRequest};
use crate::engine_error::EngineError;

pub struct HttpEngineClient {
    client: Client,
    base_url: String,
}

impl HttpEngineClient {
    /// Creates a client for the engine configured in the runtime settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &AppSettings) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| EngineError::unexpected(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Joins `segments` onto the base URL. Each segment is percent-encoded, so
    /// an id containing `/` stays a single path segment.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, EngineError> {
        let invalid_address = |e: String| {
            EngineError::unexpected(format!("Invalid engine address {}: {e}", self.base_url))
        };

        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(EngineError::unexpected(format!("Invalid identifier {segment:?}")));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid_address(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid_address("not a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Sends a request and decodes a successful JSON answer.
    ///
    /// A request that gets no HTTP answer maps to `Unreachable`, an error
    /// status to `Rejected`, and an undecodable body to `Unexpected`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, EngineError> {
        let response = request
            .send()
            .await
            .map_err(|source| EngineError::Unreachable {
                base_url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Engine answered {status}: {body}");
            return Err(EngineError::rejected(status, &body, fallback));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::unexpected(format!("{fallback}: {e}")))
    }
}

#[async_trait]
impl AnonymizationEngine for HttpEngineClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_datasets(&self) -> Result<Vec<Dataset>, EngineError> {
        info!("Fetching datasets");
        let url = self.url(&["datasets"], &[])?;
        let datasets: Vec<Dataset> = self
            .send(self.client.get(url), "Failed to load datasets")
            .await?;
        info!("Received {} datasets", datasets.len());
        Ok(datasets)
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, EngineError> {
        info!(dataset_id, "Fetching dataset");
        let url = self.url(&["datasets", dataset_id], &[])?;
        self.send(self.client.get(url), "Failed to load the dataset")
            .await
    }

    async fn upload_dataset(&self, path: &Path) -> Result<Dataset, EngineError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| EngineError::unexpected(format!("{:?} is not a file", path)))?;
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| EngineError::unexpected(format!("Failed to read {:?}: {e}", path)))?;

        info!(file = %file_name, bytes = contents.len(), "Uploading dataset");

        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name));
        let url = self.url(&["datasets", "upload"], &[])?;
        let dataset: Dataset = self
            .send(
                self.client.post(url).multipart(form),
                "Failed to upload the file",
            )
            .await?;

        info!(dataset_id = %dataset.id, "Dataset uploaded");
        Ok(dataset)
    }

    async fn create_config(
        &self,
        payload: &ConfigurationPayload,
    ) -> Result<PersistedConfiguration, EngineError> {
        info!(
            dataset_id = %payload.dataset_id,
            name = %payload.name,
            techniques = payload.techniques.len(),
            "Persisting configuration"
        );
        let url = self.url(&["configs"], &[])?;
        let persisted: PersistedConfiguration = self
            .send(
                self.client.post(url).json(payload),
                "Failed to save the configuration",
            )
            .await?;

        info!(config_id = %persisted.id, "Configuration persisted");
        Ok(persisted)
    }

    async fn list_configs(
        &self,
        dataset_id: Option<&str>,
    ) -> Result<Vec<PersistedConfiguration>, EngineError> {
        let query: Vec<(&str, &str)> = dataset_id.map(|id| ("dataset_id", id)).into_iter().collect();
        let url = self.url(&["configs"], &query)?;
        self.send(self.client.get(url), "Failed to load configurations")
            .await
    }

    async fn process(&self, request: &ProcessRequest) -> Result<ProcessingResult, EngineError> {
        info!(
            dataset_id = %request.dataset_id,
            config_id = %request.config_id,
            "Requesting processing"
        );
        let url = self.url(&["process"], &[])?;
        let result: ProcessingResult = self
            .send(
                self.client.post(url).json(request),
                "Failed to process the anonymization",
            )
            .await?;

        info!(
            result_id = %result.id,
            processing_time_ms = result.processing_time_ms,
            "Processing completed"
        );
        Ok(result)
    }

    async fn list_results(
        &self,
        dataset_id: Option<&str>,
    ) -> Result<Vec<ProcessingResult>, EngineError> {
        let query: Vec<(&str, &str)> = dataset_id.map(|id| ("dataset_id", id)).into_iter().collect();
        let url = self.url(&["results"], &query)?;
        self.send(self.client.get(url), "Failed to load results")
            .await
    }

    async fn get_result(&self, result_id: &str) -> Result<ProcessingResult, EngineError> {
        let url = self.url(&["results", result_id], &[])?;
        self.send(self.client.get(url), "Failed to load the result")
            .await
    }

    async fn stats(&self) -> Result<EngineStats, EngineError> {
        let url = self.url(&["stats"], &[])?;
        self.send(self.client.get(url), "Failed to load statistics")
            .await
    }
}
