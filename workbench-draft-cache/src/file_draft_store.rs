use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use workbench_anonymization_config::config_structs::draft_record_struct::DraftRecord;

use crate::draft_store::DraftStore;

const DEFAULT_DRAFTS_DIR: &str = "configuration_data/drafts";

/// Keeps one TOML file per dataset, `config_<dataset id>.toml`.
pub struct FileDraftStore {
    root: PathBuf,
}

impl FileDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Drafts directory under the current working directory.
    pub fn in_current_dir() -> Result<Self> {
        let mut root = std::env::current_dir().context("Failed to resolve current directory")?;
        root.push(DEFAULT_DRAFTS_DIR);
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn draft_path(&self, dataset_id: &str) -> PathBuf {
        self.root
            .join(format!("config_{}.toml", sanitize_dataset_id(dataset_id)))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, dataset_id: &str) -> Option<DraftRecord> {
        let path = self.draft_path(dataset_id);
        debug!("Draft file path: {:?}", path.as_os_str());

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read draft for dataset {dataset_id}: {e}");
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unreadable draft for dataset {dataset_id}: {e}");
                None
            }
        }
    }

    fn save(&self, dataset_id: &str, record: &DraftRecord) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create drafts directory {:?}", self.root))?;

        let serialized = toml::to_string(record).context("Failed to serialize draft")?;
        let path = self.draft_path(dataset_id);
        fs::write(&path, serialized)
            .with_context(|| format!("Failed to write draft {:?}", path))?;

        debug!("Saved draft for dataset {dataset_id}");
        Ok(())
    }

    fn remove(&self, dataset_id: &str) -> Result<()> {
        match fs::remove_file(self.draft_path(dataset_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove draft"),
        }
    }
}

/// Dataset ids come from the engine. Bytes outside `[A-Za-z0-9-]` are written
/// as `_xx` hex escapes, so an id can never escape the drafts directory and two
/// distinct ids never share a file.
fn sanitize_dataset_id(dataset_id: &str) -> String {
    let mut file_stem = String::with_capacity(dataset_id.len());
    for byte in dataset_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            file_stem.push(char::from(byte));
        } else {
            file_stem.push_str(&format!("_{byte:02x}"));
        }
    }
    file_stem
}
