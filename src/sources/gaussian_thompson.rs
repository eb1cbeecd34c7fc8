use super::errors::SourceError;
use super::source::{Estimate, RewardSource};

use crate::errors::ConfigurationError;

use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIOR_PRECISION: f64 = 1e-4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThompsonConfig {
    pub prior_mean: f64,
    pub prior_precision: f64,
}

impl Default for ThompsonConfig {
    fn default() -> Self {
        Self {
            prior_mean: 0.0,
            prior_precision: DEFAULT_PRIOR_PRECISION,
        }
    }
}

impl ThompsonConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.prior_mean.is_finite() {
            return Err(ConfigurationError::InvalidPriorMean(self.prior_mean));
        }
        if !(self.prior_precision.is_finite() && self.prior_precision > 0.0) {
            return Err(ConfigurationError::InvalidPriorPrecision(
                self.prior_precision,
            ));
        }
        Ok(())
    }
}

/// Thompson sampling with a gaussian posterior over the arm mean.
///
/// The posterior is pulled toward the running sample mean rather than the raw
/// reward, and gains exactly one unit of precision per observation. This is a
/// heuristic, not the conjugate normal update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaussianThompson {
    estimate: Estimate,
    prior: ThompsonConfig,
    posterior_mean: f64,
    posterior_precision: f64,
}

impl GaussianThompson {
    pub fn new(true_mean: f64, config: &ThompsonConfig) -> Self {
        Self {
            estimate: Estimate::new(true_mean, 0.0),
            prior: config.clone(),
            posterior_mean: config.prior_mean,
            posterior_precision: config.prior_precision,
        }
    }

    pub fn posterior_mean(&self) -> f64 {
        self.posterior_mean
    }

    pub fn posterior_precision(&self) -> f64 {
        self.posterior_precision
    }
}

#[typetag::serde]
impl RewardSource for GaussianThompson {
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
        self.posterior_mean = self.prior.prior_mean;
        self.posterior_precision = self.prior.prior_precision;
    }

    fn update(&mut self, reward: f64) {
        self.estimate.update(reward);

        let pulls = self.estimate.pulls as f64;
        self.posterior_mean = (self.posterior_precision * self.posterior_mean
            + pulls * self.estimate.value)
            / (self.posterior_precision + pulls);
        self.posterior_precision += 1.0;
    }

    fn score(&self, _: u64, rng: &mut SmallRng) -> Result<f64, SourceError> {
        let s = Normal::new(self.posterior_mean, 1.0 / self.posterior_precision.sqrt())
            .map_err(|e| SourceError::SamplingError(e.to_string()))?
            .sample(rng);

        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const SEED: u64 = 1234;
    const EPS: f64 = 1e-9;

    fn make_source() -> GaussianThompson {
        GaussianThompson::new(3.0, &ThompsonConfig::default())
    }

    #[test]
    fn starts_at_prior() {
        let source = make_source();
        assert_eq!(source.posterior_mean(), 0.0);
        assert_eq!(source.posterior_precision(), DEFAULT_PRIOR_PRECISION);
    }

    #[test]
    fn update() {
        let mut source = make_source();
        source.update(4.0);

        // prior weight 1e-4 against one observation at 4.0
        let expected = (1e-4 * 0.0 + 1.0 * 4.0) / (1e-4 + 1.0);
        assert!((source.posterior_mean() - expected).abs() < EPS);
        assert!((source.posterior_precision() - (1.0 + 1e-4)).abs() < EPS);
        assert_eq!(source.estimated_mean(), 4.0);

        source.update(2.0);
        let expected = ((1.0 + 1e-4) * expected + 2.0 * 3.0) / (1.0 + 1e-4 + 2.0);
        assert!((source.posterior_mean() - expected).abs() < EPS);
        assert!((source.posterior_precision() - (2.0 + 1e-4)).abs() < EPS);
    }

    #[test]
    fn precision_strictly_increases() {
        let mut source = make_source();
        let mut last = source.posterior_precision();
        for reward in [1.0, 0.0, 5.0, 2.5] {
            source.update(reward);
            assert!(source.posterior_precision() > last);
            last = source.posterior_precision();
        }
    }

    #[test]
    fn score_concentrates() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut source = make_source();
        (0..400).for_each(|_| source.update(3.0));

        let samples: Vec<f64> = (0..200)
            .map(|_| source.score(1, &mut rng).unwrap())
            .collect();
        assert!(samples.iter().all(|s| (s - 3.0).abs() < 0.5));
    }

    #[test]
    fn reinitialize() {
        let mut source = GaussianThompson::new(
            3.0,
            &ThompsonConfig {
                prior_mean: 1.0,
                prior_precision: 0.5,
            },
        );
        source.update(10.0);
        source.reinitialize();
        assert_eq!(source.posterior_mean(), 1.0);
        assert_eq!(source.posterior_precision(), 0.5);
        assert_eq!(source.pull_count(), 0);
        assert_eq!(source.estimated_mean(), 0.0);
    }

    #[test]
    fn invalid_config() {
        let config = ThompsonConfig {
            prior_mean: 0.0,
            prior_precision: 0.0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvalidPriorPrecision(0.0))
        );
    }
}
