//! Error types for the fc-app service layer.

use std::path::PathBuf;

/// Unified error for the command-line front end.
///
/// Result-store and series errors stay typed so callers can tell an empty
/// facility match from an out-of-range timestep.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error(transparent)]
    Results(#[from] fc_results::ResultsError),

    #[error(transparent)]
    Series(#[from] fc_series::SeriesError),

    #[error("Simulator `{program}` failed ({status}): {stderr}")]
    Simulator {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to launch simulator `{program}`")]
    SimulatorLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<fc_scenario::ScenarioError> for AppError {
    fn from(err: fc_scenario::ScenarioError) -> Self {
        AppError::Scenario(err.to_string())
    }
}
