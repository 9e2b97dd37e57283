pub mod csv_export;
pub mod csv_import;
pub mod file;

use thiserror::Error;

pub use file::{load_result, load_scenario, save_scenario};

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found: {found:?}); need {required}")]
    MissingColumns { found: Vec<String>, required: &'static str },

    #[error("no valid rows found ({skipped} skipped)")]
    NoRows { skipped: usize },

    #[error("invalid scenario: {0}")]
    Scenario(#[from] crate::model::ScenarioError),
}
