use super::trial::TrialRunner;

use crate::errors::{ConfigurationError, SimulationError};
use crate::report::ExperimentReport;
use crate::selection::SelectionPolicy;
use crate::sources::SourceType;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// One named configuration to compare against the others.
#[derive(Clone, Debug, Deserialize)]
pub struct Experiment {
    pub name: String,
    #[serde(default)]
    pub source: SourceType,
    #[serde(default)]
    pub selection: SelectionPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonSettings {
    pub true_means: Vec<f64>,
    pub max_steps: u64,
    pub max_cumulative_reward: f64,
    pub repetitions: u32,
    pub seed: Option<u64>,
}

pub struct Comparison;

impl Comparison {
    pub fn run(
        experiments: &[Experiment],
        settings: &ComparisonSettings,
    ) -> Result<Vec<ExperimentReport>, SimulationError> {
        if settings.repetitions == 0 {
            return Err(ConfigurationError::NoRepetitions.into());
        }

        experiments
            .iter()
            .map(|experiment| Self::run_experiment(experiment, settings))
            .collect()
    }

    // Every experiment starts from the same seed so they see comparable reward streams.
    fn run_experiment(
        experiment: &Experiment,
        settings: &ComparisonSettings,
    ) -> Result<ExperimentReport, SimulationError> {
        let id = Uuid::new_v4();
        info!(%id, experiment = %experiment.name, "Running experiment");

        let mut runner = TrialRunner::new(
            &experiment.source,
            &settings.true_means,
            experiment.selection,
            settings.seed,
        )?;

        let num_arms = settings.true_means.len();
        let mut totals = Totals::new(num_arms);

        for _ in 0..settings.repetitions {
            let outcome = runner.run(settings.max_steps, settings.max_cumulative_reward)?;

            totals.steps += outcome.steps as f64;
            totals.cumulative_reward += outcome.cumulative_reward;
            totals.mean_reward_per_step += runner.mean_reward_per_step().unwrap_or_default();
            totals.optimal_arm_fraction += runner.optimal_arm_fraction().unwrap_or_default();
            if let Some(fractions) = runner.selection_fractions() {
                totals
                    .selection_fractions
                    .iter_mut()
                    .zip(fractions)
                    .for_each(|(total, fraction)| *total += fraction);
            }
        }

        let n = settings.repetitions as f64;
        let report = ExperimentReport {
            id,
            name: experiment.name.clone(),
            source: experiment.source.clone(),
            selection: experiment.selection,
            repetitions: settings.repetitions,
            optimal_arm: runner.optimal_arm(),
            mean_steps: totals.steps / n,
            mean_cumulative_reward: totals.cumulative_reward / n,
            mean_reward_per_step: totals.mean_reward_per_step / n,
            optimal_arm_fraction: totals.optimal_arm_fraction / n,
            selection_fractions: totals
                .selection_fractions
                .iter()
                .map(|total| total / n)
                .collect(),
            last_trace: runner.trace().to_vec(),
            last_arms: runner.arms().to_vec(),
        };

        info!(
            %id,
            experiment = %experiment.name,
            mean_reward_per_step = report.mean_reward_per_step,
            optimal_arm_fraction = report.optimal_arm_fraction,
            "Experiment finished"
        );

        Ok(report)
    }
}

struct Totals {
    steps: f64,
    cumulative_reward: f64,
    mean_reward_per_step: f64,
    optimal_arm_fraction: f64,
    selection_fractions: Vec<f64>,
}

impl Totals {
    fn new(num_arms: usize) -> Self {
        Self {
            steps: 0.0,
            cumulative_reward: 0.0,
            mean_reward_per_step: 0.0,
            optimal_arm_fraction: 0.0,
            selection_fractions: vec![0.0; num_arms],
        }
    }
}
