use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};
use workbench_anonymization_config::config_structs::configuration_struct::{
    ConfigurationDraft, ConfigurationPayload,
};
use workbench_engine_client::anonymization_engine::{AnonymizationEngine, ProcessRequest};
use workbench_engine_client::engine_error::EngineError;

use crate::submission_error::SubmissionError;
use crate::submission_state::{SubmissionOutcome, SubmissionState};

/// Drives the persist-then-process protocol against the engine.
///
/// Only one submission runs at a time. The configuration id returned by a
/// successful persist is kept together with the payload it came from, so a
/// retry of the same payload goes straight to processing.
pub struct SubmissionController {
    engine: Arc<dyn AnonymizationEngine>,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
    persisted: Mutex<Option<(ConfigurationPayload, String)>>,
    active_dataset: Mutex<Option<String>>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SubmissionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard(flag))
            .map_err(|_| SubmissionError::AlreadyInFlight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SubmissionController {
    pub fn new(engine: Arc<dyn AnonymizationEngine>) -> Self {
        Self {
            engine,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Editing),
            persisted: Mutex::new(None),
            active_dataset: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.state).clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The configuration id kept from the last successful persist.
    pub fn retained_config_id(&self) -> Option<String> {
        lock(&self.persisted)
            .as_ref()
            .map(|(_, config_id)| config_id.clone())
    }

    pub fn active_dataset(&self) -> Option<String> {
        lock(&self.active_dataset).clone()
    }

    /// Switches the dataset results may be applied to. A submission still in
    /// flight for the previous dataset will have its result discarded.
    pub fn activate_dataset(&self, dataset_id: Option<&str>) {
        *lock(&self.active_dataset) = dataset_id.map(str::to_string);
        if !self.is_in_flight() {
            self.set_state(SubmissionState::Editing);
        }
    }

    /// Validates the draft, persists it (unless the same payload was already
    /// persisted) and requests processing of the persisted configuration.
    pub async fn submit(
        &self,
        draft: &ConfigurationDraft,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let payload = self.prepare(draft)?;

        let config_id = self.persist(&payload).await?;
        if !self.is_active(&payload.dataset_id) {
            return Ok(self.discard(&payload.dataset_id));
        }

        self.set_state(SubmissionState::Processing {
            config_id: config_id.clone(),
        });
        let request = ProcessRequest::builder()
            .dataset_id(payload.dataset_id.as_str())
            .config_id(config_id.as_str())
            .build();

        match self.engine.process(&request).await {
            Ok(result) => {
                if !self.is_active(&payload.dataset_id) {
                    return Ok(self.discard(&payload.dataset_id));
                }
                info!(%config_id, result_id = %result.id, "Submission completed");
                self.set_state(SubmissionState::Completed {
                    config_id,
                    result_id: result.id.clone(),
                });
                Ok(SubmissionOutcome::Completed(Box::new(result)))
            }
            Err(e) => {
                error!(%config_id, "Processing failed: {e}");
                self.set_state(SubmissionState::Editing);
                Err(e.into())
            }
        }
    }

    /// Runs the persist step alone and returns the configuration id.
    pub async fn persist_only(&self, draft: &ConfigurationDraft) -> Result<String, SubmissionError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let payload = self.prepare(draft)?;
        self.persist(&payload).await
    }

    fn prepare(&self, draft: &ConfigurationDraft) -> Result<ConfigurationPayload, SubmissionError> {
        if !self.is_active(draft.dataset_id()) {
            return Err(SubmissionError::NoDatasetSelected);
        }
        Ok(draft.to_payload()?)
    }

    async fn persist(&self, payload: &ConfigurationPayload) -> Result<String, SubmissionError> {
        let retained = lock(&self.persisted)
            .as_ref()
            .filter(|(persisted_payload, _)| persisted_payload == payload)
            .map(|(_, config_id)| config_id.clone());

        if let Some(config_id) = retained {
            info!(%config_id, "Configuration unchanged, reusing persisted id");
            self.set_state(SubmissionState::Persisted {
                config_id: config_id.clone(),
            });
            return Ok(config_id);
        }

        self.set_state(SubmissionState::Persisting);
        let persisted = match self.engine.create_config(payload).await {
            Ok(persisted) if persisted.id.is_empty() => Err(EngineError::unexpected(
                "the engine returned a configuration without an id",
            )),
            other => other,
        };

        match persisted {
            Ok(persisted) => {
                *lock(&self.persisted) = Some((payload.clone(), persisted.id.clone()));
                self.set_state(SubmissionState::Persisted {
                    config_id: persisted.id.clone(),
                });
                Ok(persisted.id)
            }
            Err(e) => {
                error!(dataset_id = %payload.dataset_id, "Persisting configuration failed: {e}");
                self.set_state(SubmissionState::Editing);
                Err(e.into())
            }
        }
    }

    fn discard(&self, dataset_id: &str) -> SubmissionOutcome {
        warn!(dataset_id, "Dataset is no longer active, discarding submission result");
        self.set_state(SubmissionState::Editing);
        SubmissionOutcome::Discarded {
            dataset_id: dataset_id.to_string(),
        }
    }

    fn is_active(&self, dataset_id: &str) -> bool {
        lock(&self.active_dataset).as_deref() == Some(dataset_id)
    }

    fn set_state(&self, state: SubmissionState) {
        *lock(&self.state) = state;
    }
}
