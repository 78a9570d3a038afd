use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Universe has {universe} assets but portfolios need {portfolio_size}")]
    UniverseTooSmall { universe: usize, portfolio_size: usize },

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Failure while scoring a single portfolio. Absorbed by the evaluator and
/// turned into a worst-case fitness; never aborts a generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("portfolio selects no assets")]
    EmptySelection,

    #[error("asset index {index} is outside a universe of {universe} assets")]
    IndexOutOfRange { index: usize, universe: usize },

    #[error("objective '{objective}' evaluated to a non-finite value")]
    NonFinite { objective: &'static str },
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
