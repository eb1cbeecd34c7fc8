use super::basic::Basic;
use super::errors::SourceError;
use super::gaussian_thompson::{GaussianThompson, ThompsonConfig};
use super::optimistic::{Optimistic, OptimisticConfig};
use super::ucb::{Ucb, UcbConfig};

use crate::errors::ConfigurationError;

use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArmStats {
    pub true_mean: f64,
    pub estimated_mean: f64,
    pub pulls: u64,
}

/// Which arm model every arm of a runner is built with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceType {
    #[default]
    Basic,
    Optimistic(OptimisticConfig),
    Ucb(UcbConfig),
    GaussianThompson(ThompsonConfig),
}

impl SourceType {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            SourceType::Basic => Ok(()),
            SourceType::Optimistic(config) => config.validate(),
            SourceType::Ucb(config) => config.validate(),
            SourceType::GaussianThompson(config) => config.validate(),
        }
    }

    pub fn build(&self, true_mean: f64) -> Result<Box<dyn RewardSource>, ConfigurationError> {
        self.validate()?;

        let source: Box<dyn RewardSource> = match self {
            SourceType::Basic => Box::new(Basic::new(true_mean)),
            SourceType::Optimistic(config) => Box::new(Optimistic::new(true_mean, config)),
            SourceType::Ucb(config) => Box::new(Ucb::new(true_mean, config)),
            SourceType::GaussianThompson(config) => {
                Box::new(GaussianThompson::new(true_mean, config))
            }
        };

        Ok(source)
    }
}

impl Clone for Box<dyn RewardSource> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub trait CloneBoxedSource {
    fn clone_box(&self) -> Box<dyn RewardSource>;
}

impl<T> CloneBoxedSource for T
where
    T: RewardSource + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn RewardSource> {
        Box::new(self.clone())
    }
}

/// A stochastic arm: a hidden true mean plus the running estimate a policy
/// learns from its rewards.
#[typetag::serde(tag = "type")]
pub trait RewardSource: Send + Debug + CloneBoxedSource {
    fn true_mean(&self) -> f64;
    fn estimated_mean(&self) -> f64;
    fn pull_count(&self) -> u64;

    fn reinitialize(&mut self);
    fn update(&mut self, reward: f64);

    /// Value compared across arms by the arg-max selection rule.
    fn score(&self, current_step: u64, rng: &mut SmallRng) -> Result<f64, SourceError>;

    fn draw_reward(&self, rng: &mut SmallRng) -> f64 {
        draw_reward(self.true_mean(), rng)
    }

    fn stats(&self) -> ArmStats {
        ArmStats {
            true_mean: self.true_mean(),
            estimated_mean: self.estimated_mean(),
            pulls: self.pull_count(),
        }
    }
}

/// Unit-variance gaussian reward around `true_mean`, clamped at zero.
pub fn draw_reward<R: Rng + ?Sized>(true_mean: f64, rng: &mut R) -> f64 {
    let noise: f64 = rng.sample(StandardNormal);
    (true_mean + noise).max(0.0)
}

/// Sample-average state shared by every arm model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(super) struct Estimate {
    pub(super) true_mean: f64,
    pub(super) value: f64,
    pub(super) pulls: u64,
}

impl Estimate {
    pub(super) fn new(true_mean: f64, initial_value: f64) -> Self {
        Self {
            true_mean,
            value: initial_value,
            pulls: 0,
        }
    }

    pub(super) fn reset(&mut self, initial_value: f64) {
        self.value = initial_value;
        self.pulls = 0;
    }

    pub(super) fn update(&mut self, reward: f64) {
        self.pulls += 1;
        self.value += (reward - self.value) / (self.pulls as f64);
    }
}
