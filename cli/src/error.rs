use callwave_core_rs::billing::RateScheduleError;
use callwave_core_rs::policy::SubmissionError;
use callwave_core_rs::ProjectionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Unknown timezone '{0}'")]
    Timezone(String),

    #[error(transparent)]
    Rates(#[from] RateScheduleError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
