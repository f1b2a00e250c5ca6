use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: could not parse date '{value}' (expected day-first, e.g. 05-02-2010)")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: weekly sales must be positive to take the log, got {value}")]
    NonPositiveSales { row: usize, value: f64 },

    #[error("dataset has {rows} usable row(s); at least {min} are needed to split")]
    TooFewRows { rows: usize, min: usize },

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("{model} failed to fit: {reason}")]
    ModelFit { model: String, reason: String },

    #[error("metric error: {0}")]
    Metric(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
