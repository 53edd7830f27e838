use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use workbench_anonymization_config::config_structs::draft_record_struct::DraftRecord;

use crate::draft_store::DraftStore;

/// Process-local drafts, lost on exit.
#[derive(Default)]
pub struct InMemoryDraftStore {
    drafts: Mutex<HashMap<String, DraftRecord>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn load(&self, dataset_id: &str) -> Option<DraftRecord> {
        self.drafts.lock().ok()?.get(dataset_id).cloned()
    }

    fn save(&self, dataset_id: &str, record: &DraftRecord) -> Result<()> {
        self.drafts
            .lock()
            .map_err(|_| anyhow!("draft store lock poisoned"))?
            .insert(dataset_id.to_string(), record.clone());
        Ok(())
    }

    fn remove(&self, dataset_id: &str) -> Result<()> {
        self.drafts
            .lock()
            .map_err(|_| anyhow!("draft store lock poisoned"))?
            .remove(dataset_id);
        Ok(())
    }
}
