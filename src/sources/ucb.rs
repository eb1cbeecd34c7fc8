use super::errors::SourceError;
use super::source::{Estimate, RewardSource};

use crate::errors::ConfigurationError;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UcbConfig {
    pub confidence_level: f64,
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl UcbConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.confidence_level.is_finite() && self.confidence_level >= 0.0 {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidConfidenceLevel(
                self.confidence_level,
            ))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ucb {
    estimate: Estimate,
    confidence_level: f64,
}

impl Ucb {
    pub fn new(true_mean: f64, config: &UcbConfig) -> Self {
        Self {
            estimate: Estimate::new(true_mean, 0.0),
            confidence_level: config.confidence_level,
        }
    }

    fn bonus(&self, current_step: u64) -> f64 {
        let pulls = self.estimate.pulls as f64;
        self.confidence_level * ((current_step as f64).ln() / pulls).sqrt()
    }
}

#[typetag::serde]
impl RewardSource for Ucb {
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
        self.estimate.reset(0.0);
    }

    fn update(&mut self, reward: f64) {
        self.estimate.update(reward);
    }

    fn score(&self, current_step: u64, _: &mut SmallRng) -> Result<f64, SourceError> {
        if current_step == 0 {
            return Err(SourceError::NonPositiveStep(current_step));
        }

        // an arm never pulled has unbounded uncertainty
        if self.estimate.pulls == 0 {
            return Ok(f64::INFINITY);
        }

        Ok(self.estimate.value + self.bonus(current_step))
    }
}
