use crate::errors::{ConfigurationError, SimulationError};
use crate::sources::RewardSource;

use rand::rngs::SmallRng;
use rand::seq::{IndexedRandom, IteratorRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EPSILON: f64 = 0.2;

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionPolicy {
    /// Arg-max of every arm's score.
    #[default]
    Greedy,
    /// Uniformly random arm with probability `epsilon`, otherwise arg-max of
    /// the estimated means. Exploration bonuses are ignored.
    EpsilonGreedy {
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

impl SelectionPolicy {
    pub fn epsilon_greedy(epsilon: f64) -> Result<Self, ConfigurationError> {
        let policy = SelectionPolicy::EpsilonGreedy { epsilon };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            SelectionPolicy::Greedy => Ok(()),
            SelectionPolicy::EpsilonGreedy { epsilon } if (0.0..=1.0).contains(&epsilon) => {
                Ok(())
            }
            SelectionPolicy::EpsilonGreedy { epsilon } => {
                Err(ConfigurationError::EpsilonOutOfRange(epsilon))
            }
        }
    }

    pub fn select(
        &self,
        arms: &[Box<dyn RewardSource>],
        current_step: u64,
        rng: &mut SmallRng,
    ) -> Result<usize, SimulationError> {
        match *self {
            SelectionPolicy::Greedy => {
                let scores = arms
                    .iter()
                    .map(|arm| arm.score(current_step, rng))
                    .collect::<Result<Vec<f64>, _>>()?;
                argmax(&scores, rng)
            }
            SelectionPolicy::EpsilonGreedy { epsilon } => {
                if rng.random::<f64>() < epsilon {
                    (0..arms.len())
                        .choose(rng)
                        .ok_or(SimulationError::NoArmsAvailable)
                } else {
                    let estimates: Vec<f64> =
                        arms.iter().map(|arm| arm.estimated_mean()).collect();
                    argmax(&estimates, rng)
                }
            }
        }
    }
}

/// Index of the largest value, ties broken uniformly at random.
pub fn argmax(values: &[f64], rng: &mut SmallRng) -> Result<usize, SimulationError> {
    let mut best = f64::NEG_INFINITY;
    let mut ties = Vec::new();

    for (i, &value) in values.iter().enumerate() {
        if value > best {
            best = value;
            ties.clear();
            ties.push(i);
        } else if value == best {
            ties.push(i);
        }
    }

    ties.choose(rng)
        .copied()
        .ok_or(SimulationError::NoArmsAvailable)
}
