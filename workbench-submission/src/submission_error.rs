use thiserror::Error;
use workbench_anonymization_config::config_error::ConfigError;
use workbench_engine_client::engine_error::EngineError;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    AlreadyInFlight,

    /// No dataset is active, or the configuration belongs to another dataset.
    #[error("select a dataset before submitting")]
    NoDatasetSelected,

    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
