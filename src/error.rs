use thiserror::Error;

/// Errors that can occur while loading, sampling, or configuring a richness analysis.
///
/// Numeric degeneracies (empty grids, zero frequencies) are not errors: the
/// estimators return NaN or infinity and the caller checks finiteness.
#[derive(Error, Debug)]
pub enum RichnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}
