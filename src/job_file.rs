use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use workbench_anonymization_config::config_structs::column_mapping_struct::ColumnMapping;
use workbench_anonymization_config::config_structs::configuration_struct::ConfigurationDraft;
use workbench_anonymization_config::config_structs::global_params_struct::GlobalParameters;
use workbench_anonymization_config::config_structs::technique_struct::TechniqueAssignment;

/// A non-interactive job description in the draft TOML layout. Every section
/// is optional; a missing one keeps what the saved draft already has.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobFile {
    pub name: Option<String>,
    pub column_mappings: Option<Vec<ColumnMapping>>,
    pub techniques: Option<Vec<TechniqueAssignment>>,
    pub global_params: Option<GlobalParameters>,
}

impl JobFile {
    /// Overlays the sections present in the job onto the draft.
    pub fn apply_to(self, draft: &mut ConfigurationDraft) {
        let mut record = draft.to_draft_record();
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(column_mappings) = self.column_mappings {
            record.column_mappings = column_mappings;
        }
        if let Some(techniques) = self.techniques {
            record.techniques = techniques;
        }
        if let Some(global_params) = self.global_params {
            record.global_params = global_params;
        }
        draft.apply_draft_record(record);
    }
}

pub fn load_job(path: &Path) -> Result<JobFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read job file {path:?}"))?;
    parse_job(&content).with_context(|| format!("Invalid job file {path:?}"))
}

fn parse_job(content: &str) -> Result<JobFile> {
    Ok(toml::from_str(content)?)
}
