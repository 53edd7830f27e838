use std::fmt::Display;

use workbench_result_metrics::result_structs::processing_result_struct::ProcessingResult;

/// Where a submission stands. Failures in `Persisting` or `Processing` go
/// back to `Editing`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Editing,
    Persisting,
    Persisted {
        config_id: String,
    },
    Processing {
        config_id: String,
    },
    Completed {
        config_id: String,
        result_id: String,
    },
}

impl SubmissionState {
    pub fn is_editing(&self) -> bool {
        matches!(self, SubmissionState::Editing)
    }
}

impl Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionState::Editing => write!(f, "editing"),
            SubmissionState::Persisting => write!(f, "persisting"),
            SubmissionState::Persisted { config_id } => write!(f, "persisted ({config_id})"),
            SubmissionState::Processing { config_id } => write!(f, "processing ({config_id})"),
            SubmissionState::Completed {
                config_id,
                result_id,
            } => write!(f, "completed ({config_id} -> {result_id})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    Completed(Box<ProcessingResult>),
    /// The active dataset changed while the submission was in flight; whatever
    /// came back was not applied.
    Discarded { dataset_id: String },
}
