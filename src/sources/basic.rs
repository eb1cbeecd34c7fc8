use super::errors::SourceError;
use super::source::{Estimate, RewardSource};

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Basic {
    estimate: Estimate,
}

impl Basic {
    pub fn new(true_mean: f64) -> Self {
        Self {
            estimate: Estimate::new(true_mean, 0.0),
        }
    }
}

#[typetag::serde]
impl RewardSource for Basic {
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

    fn score(&self, _: u64, _: &mut SmallRng) -> Result<f64, SourceError> {
        Ok(self.estimate.value)
    }
}
