use crate::sources::errors::SourceError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("max_steps must be positive")]
    NonPositiveStepBudget,
    #[error("max_cumulative_reward must be positive, got {0}")]
    NonPositiveRewardBudget(f64),
    #[error("At least one arm is required")]
    NoArms,
    #[error("True mean of arm {0} must be finite, got {1}")]
    InvalidTrueMean(usize, f64),
    #[error("epsilon must lie in [0, 1], got {0}")]
    EpsilonOutOfRange(f64),
    #[error("initial_estimate must be finite, got {0}")]
    InvalidInitialEstimate(f64),
    #[error("confidence_level must be finite and non-negative, got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("prior_mean must be finite, got {0}")]
    InvalidPriorMean(f64),
    #[error("prior_precision must be finite and positive, got {0}")]
    InvalidPriorPrecision(f64),
    #[error("repetitions must be positive")]
    NoRepetitions,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("No arm could be selected")]
    NoArmsAvailable,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
