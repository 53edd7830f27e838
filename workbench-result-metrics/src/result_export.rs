use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::result_structs::processing_result_struct::ProcessingResult;

impl ProcessingResult {
    pub fn default_export_file_name(&self) -> String {
        format!("anonymized_data_{}.json", self.id)
    }

    /// Writes the anonymized rows as pretty-printed JSON.
    pub fn export_anonymized_rows(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.anonymized_data)
            .context("Failed to serialize anonymized rows")?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write anonymized rows to {:?}", path))?;

        info!(
            "Exported {} anonymized rows of result {} to {:?}",
            self.anonymized_data.len(),
            self.id,
            path
        );
        Ok(())
    }
}
