use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not decode {} as {encoding}", path.display())]
    Encoding { path: PathBuf, encoding: String },

    #[error("Line {line}, column {column}: cannot parse '{value}' ({reason})")]
    FieldParse {
        line: u64,
        column: usize,
        value: String,
        reason: String,
    },

    #[error("Invalid time of day '{value}': {reason}")]
    InvalidTimeOfDay { value: String, reason: String },

    #[error("Cannot derive observation day from file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Observation {id} not found")]
    ObservationNotFound { id: i64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}

impl ProcessingError {
    /// True for errors that abort a single source file rather than the run.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            ProcessingError::Io(_)
                | ProcessingError::Csv(_)
                | ProcessingError::Encoding { .. }
                | ProcessingError::FieldParse { .. }
                | ProcessingError::InvalidTimeOfDay { .. }
                | ProcessingError::InvalidFileName { .. }
        )
    }
}
