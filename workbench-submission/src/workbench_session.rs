use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use workbench_anonymization_config::config_structs::configuration_struct::ConfigurationDraft;
use workbench_anonymization_config::config_structs::dataset_struct::Dataset;
use workbench_draft_cache::draft_store::DraftStore;
use workbench_engine_client::anonymization_engine::AnonymizationEngine;

use crate::submission_controller::SubmissionController;
use crate::submission_error::SubmissionError;
use crate::submission_state::{SubmissionOutcome, SubmissionState};

/// One user's working context: the selected dataset, its draft configuration
/// and the submission controller.
///
/// Every failing operation also records its message in `last_error`, so a
/// front end can show it inline and keep the draft editable.
pub struct WorkbenchSession {
    engine: Arc<dyn AnonymizationEngine>,
    drafts: Arc<dyn DraftStore>,
    controller: SubmissionController,
    dataset: Option<Dataset>,
    draft: Option<ConfigurationDraft>,
    last_error: Option<String>,
}

impl WorkbenchSession {
    pub fn new(engine: Arc<dyn AnonymizationEngine>, drafts: Arc<dyn DraftStore>) -> Self {
        Self {
            controller: SubmissionController::new(engine.clone()),
            engine,
            drafts,
            dataset: None,
            draft: None,
            last_error: None,
        }
    }

    /// Fetches the dataset, seeds its column mappings and overlays the saved
    /// draft, if any.
    pub async fn select_dataset(&mut self, dataset_id: &str) -> Result<(), SubmissionError> {
        let dataset = match self.engine.get_dataset(dataset_id).await {
            Ok(dataset) => dataset,
            Err(e) => return Err(self.record(e.into())),
        };

        let mut draft = ConfigurationDraft::for_dataset(&dataset);
        match self.drafts.load(&dataset.id) {
            Some(record) => {
                info!(dataset_id = %dataset.id, "Restoring saved draft");
                draft.apply_draft_record(record);
            }
            None => info!(dataset_id = %dataset.id, "Starting a new draft"),
        }

        self.controller.activate_dataset(Some(&dataset.id));
        self.dataset = Some(dataset);
        self.draft = Some(draft);
        self.last_error = None;
        Ok(())
    }

    /// Leaves the current dataset. A submission still in flight for it will be
    /// discarded when it completes.
    pub fn deselect_dataset(&mut self) {
        self.controller.activate_dataset(None);
        self.dataset = None;
        self.draft = None;
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn draft(&self) -> Option<&ConfigurationDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ConfigurationDraft> {
        self.draft.as_mut()
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Writes the current draft to the draft cache.
    pub fn save_draft(&self) -> Result<()> {
        if let Some(draft) = &self.draft {
            self.drafts.save(draft.dataset_id(), &draft.to_draft_record())?;
        }
        Ok(())
    }

    /// Drops the saved draft and starts over from the freshly classified
    /// dataset.
    pub fn reset_draft(&mut self) -> Result<()> {
        if let Some(dataset) = &self.dataset {
            self.drafts.remove(&dataset.id)?;
            self.draft = Some(ConfigurationDraft::for_dataset(dataset));
        }
        Ok(())
    }

    /// Saves the draft, then persists and processes it.
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, SubmissionError> {
        let draft = self.draft_for_submission()?;
        let outcome = self.controller.submit(&draft).await;
        self.settle(outcome)
    }

    /// Saves the draft, then persists it without processing.
    pub async fn persist_only(&mut self) -> Result<String, SubmissionError> {
        let draft = self.draft_for_submission()?;
        let outcome = self.controller.persist_only(&draft).await;
        self.settle(outcome)
    }

    fn draft_for_submission(&mut self) -> Result<ConfigurationDraft, SubmissionError> {
        let Some(draft) = self.draft.clone() else {
            return Err(self.record(SubmissionError::NoDatasetSelected));
        };

        if let Err(e) = self.save_draft() {
            warn!(dataset_id = %draft.dataset_id(), "Failed to save draft: {e:#}");
        }
        Ok(draft)
    }

    fn settle<T>(&mut self, outcome: Result<T, SubmissionError>) -> Result<T, SubmissionError> {
        match outcome {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    fn record(&mut self, error: SubmissionError) -> SubmissionError {
        self.last_error = Some(error.to_string());
        error
    }
}
