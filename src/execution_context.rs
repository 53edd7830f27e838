use std::sync::Arc;

use anyhow::Result;
use workbench_app_settings::settings_structs::AppSettings;
use workbench_draft_cache::draft_store::DraftStore;
use workbench_draft_cache::file_draft_store::FileDraftStore;
use workbench_engine_client::anonymization_engine::AnonymizationEngine;
use workbench_engine_client::http_engine_client::HttpEngineClient;
use workbench_submission::workbench_session::WorkbenchSession;

/// Everything a command needs: the loaded settings, the engine client and the
/// draft cache. Built once per invocation and passed down explicitly.
pub struct ExecutionContext {
    settings: AppSettings,
    engine: Arc<dyn AnonymizationEngine>,
    drafts: Arc<dyn DraftStore>,
}

impl ExecutionContext {
    pub async fn load(settings_source: &str) -> Result<Self> {
        let settings = AppSettings::load(settings_source).await;
        let engine = Arc::new(HttpEngineClient::new(&settings)?);
        let drafts = Arc::new(FileDraftStore::in_current_dir()?);

        Ok(Self {
            settings,
            engine,
            drafts,
        })
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn engine(&self) -> &dyn AnonymizationEngine {
        self.engine.as_ref()
    }

    pub fn drafts(&self) -> &dyn DraftStore {
        self.drafts.as_ref()
    }

    pub fn session(&self) -> WorkbenchSession {
        WorkbenchSession::new(self.engine.clone(), self.drafts.clone())
    }
}
