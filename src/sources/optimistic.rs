use super::errors::SourceError;
use super::source::{Estimate, RewardSource};

use crate::errors::ConfigurationError;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimisticConfig {
    pub initial_estimate: f64,
}

impl OptimisticConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.initial_estimate.is_finite() {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidInitialEstimate(
                self.initial_estimate,
            ))
        }
    }
}

/// Arm whose estimate starts at an optimistic value, so a greedy policy keeps
/// trying it until real rewards pull the estimate down.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Optimistic {
    estimate: Estimate,
    initial_estimate: f64,
}

impl Optimistic {
    pub fn new(true_mean: f64, config: &OptimisticConfig) -> Self {
        Self {
            estimate: Estimate::new(true_mean, config.initial_estimate),
            initial_estimate: config.initial_estimate,
        }
    }
}

#[typetag::serde]
impl RewardSource for Optimistic {
    fn true_mean(&self) -> f64 {
        self.estimate.true_mean
    }

    fn estimated_mean(&self) -> f64 {
        self.estimate.value
    }

    fn pull_count(&self) -> u64 {
        self.estimate.pulls
    }

    fn reinitialize(&mut self) {
        self.estimate.reset(self.initial_estimate);
    }

    fn update(&mut self, reward: f64) {
        self.estimate.update(reward);
    }

    fn score(&self, _: u64, _: &mut SmallRng) -> Result<f64, SourceError> {
        Ok(self.estimate.value)
    }
}
