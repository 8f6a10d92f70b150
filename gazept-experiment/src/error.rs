use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("trial {0} is still in progress")]
    TrialInProgress(u32),
    #[error("no trial in progress")]
    NoActiveTrial,
    #[error("trial {0} was already activated")]
    AlreadyActivated(u32),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
