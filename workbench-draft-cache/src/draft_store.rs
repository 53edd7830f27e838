use anyhow::Result;
use workbench_anonymization_config::config_structs::draft_record_struct::DraftRecord;

/// Per-dataset storage of in-progress configurations.
///
/// Saving overwrites whatever was stored for the dataset (last write wins,
/// no versioning). Loading never fails: a missing or unreadable draft is
/// reported as `None`.
pub trait DraftStore: Send + Sync {
    fn load(&self, dataset_id: &str) -> Option<DraftRecord>;

    fn save(&self, dataset_id: &str, record: &DraftRecord) -> Result<()>;

    fn remove(&self, dataset_id: &str) -> Result<()>;
}
