use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("Cannot take the logarithm of step {0}, steps are 1-based")]
    NonPositiveStep(u64),
    #[error("Failed to sample posterior: {0}")]
    SamplingError(String),
}
