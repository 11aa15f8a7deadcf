use thiserror::Error;

/// Failures of the field pipeline. All of them are input errors: the
/// pipeline is deterministic, so re-running with the same input fails the
/// same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Insufficient data: {distinct} distinct sites, need at least {required} spanning a non-zero area")]
    InsufficientData { distinct: usize, required: usize },

    #[error("Geometry mismatch: {left:?} vs {right:?} (rows, cols)")]
    GeometryMismatch { left: (usize, usize), right: (usize, usize) },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid sample #{index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    #[error("Invalid smoothing parameters: sigma={sigma}, truncate={truncate}")]
    InvalidSmoothing { sigma: f64, truncate: f64 },

    #[error("Shot sets were filtered with different game-state predicates")]
    IncomparableShotSets,
}

/// Failures while reading shot tables or configuration files.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Shot log is missing required column '{0}'")]
    MissingColumn(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, FieldError>;
