use std::path::Path;

use thiserror::Error;

use crate::settings_structs::UploadSettings;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum UploadRejected {
    #[error("please upload a valid file ({accepted})")]
    UnsupportedFormat { accepted: String },

    #[error("the file size must be less than {max_mb}MB")]
    TooLarge { max_mb: u64 },
}

impl UploadSettings {
    /// Checks a file against the accepted formats and the size limit before it
    /// is sent to the engine.
    pub fn check_file(&self, path: &Path, size_bytes: u64) -> Result<(), UploadRejected> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let accepted = self
            .accepted_formats
            .iter()
            .any(|format| file_name.ends_with(&format.to_lowercase()));

        if !accepted {
            return Err(UploadRejected::UnsupportedFormat {
                accepted: self.accepted_formats.join(", "),
            });
        }

        if size_bytes > self.max_file_size_mb.saturating_mul(BYTES_PER_MB) {
            return Err(UploadRejected::TooLarge {
                max_mb: self.max_file_size_mb,
            });
        }

        Ok(())
    }
}
