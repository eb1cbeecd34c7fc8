use crate::errors::{ConfigurationError, SimulationError};
use crate::selection::SelectionPolicy;
use crate::sources::{ArmStats, MaybeSeededRng, RewardSource, SourceType};

use std::cmp::Ordering;
use tracing::{debug, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerState {
    Ready,
    Running,
    Stopped(StopReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    StepBudget,
    RewardBudget,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunOutcome {
    pub steps: u64,
    pub cumulative_reward: f64,
    pub stop_reason: StopReason,
}

/// Runs the select / observe / update loop over a fixed set of arms.
#[derive(Debug)]
pub struct TrialRunner {
    arms: Vec<Box<dyn RewardSource>>,
    selection: SelectionPolicy,
    rng: MaybeSeededRng,
    optimal_arm: usize,
    selections: Vec<u64>,
    cumulative_reward: f64,
    steps: u64,
    trace: Vec<f64>,
    state: RunnerState,
}

impl TrialRunner {
    pub fn new(
        source_type: &SourceType,
        true_means: &[f64],
        selection: SelectionPolicy,
        seed: Option<u64>,
    ) -> Result<Self, ConfigurationError> {
        if true_means.is_empty() {
            return Err(ConfigurationError::NoArms);
        }
        if let Some((arm_id, &mean)) = true_means
            .iter()
            .enumerate()
            .find(|(_, mean)| !mean.is_finite())
        {
            return Err(ConfigurationError::InvalidTrueMean(arm_id, mean));
        }
        selection.validate()?;

        let arms = true_means
            .iter()
            .map(|&mean| source_type.build(mean))
            .collect::<Result<Vec<_>, _>>()?;

        // first index wins when several arms share the best true mean
        let optimal_arm = true_means
            .iter()
            .enumerate()
            .fold(0, |best, (arm_id, mean)| {
                match mean.partial_cmp(&true_means[best]) {
                    Some(Ordering::Greater) => arm_id,
                    _ => best,
                }
            });

        Ok(Self {
            selections: vec![0; arms.len()],
            arms,
            selection,
            rng: MaybeSeededRng::new(seed),
            optimal_arm,
            cumulative_reward: 0.0,
            steps: 0,
            trace: Vec::new(),
            state: RunnerState::Ready,
        })
    }

    fn validate(
        &self,
        max_steps: u64,
        max_cumulative_reward: f64,
    ) -> Result<(), ConfigurationError> {
        if max_steps == 0 {
            return Err(ConfigurationError::NonPositiveStepBudget);
        }
        // NaN fails this comparison as well
        if !(max_cumulative_reward > 0.0) {
            return Err(ConfigurationError::NonPositiveRewardBudget(
                max_cumulative_reward,
            ));
        }
        if self.arms.is_empty() {
            return Err(ConfigurationError::NoArms);
        }
        self.selection.validate()
    }

    fn reset(&mut self) {
        self.arms.iter_mut().for_each(|arm| arm.reinitialize());
        self.selections.iter_mut().for_each(|count| *count = 0);
        self.cumulative_reward = 0.0;
        self.steps = 0;
        self.trace.clear();
        self.state = RunnerState::Ready;
    }

    /// Runs until `max_steps` steps were taken or the cumulative reward
    /// reaches `max_cumulative_reward`, whichever comes first.
    pub fn run(
        &mut self,
        max_steps: u64,
        max_cumulative_reward: f64,
    ) -> Result<RunOutcome, SimulationError> {
        self.validate(max_steps, max_cumulative_reward)?;
        self.reset();

        info!(
            arms = self.arms.len(),
            max_steps,
            max_cumulative_reward,
            selection = ?self.selection,
            "Starting run"
        );
        self.state = RunnerState::Running;

        let mut current_step: u64 = 1;
        let stop_reason = loop {
            let arm_id = self
                .selection
                .select(&self.arms, current_step, self.rng.get_rng())?;
            let arm = &mut self.arms[arm_id];
            let reward = arm.draw_reward(self.rng.get_rng());
            arm.update(reward);

            self.cumulative_reward += reward;
            self.steps += 1;
            self.selections[arm_id] += 1;
            self.trace.push(self.cumulative_reward / self.steps as f64);
            trace!(step = current_step, arm_id, reward, "Pulled arm");

            if self.cumulative_reward >= max_cumulative_reward {
                break StopReason::RewardBudget;
            }
            if self.steps >= max_steps {
                break StopReason::StepBudget;
            }
            current_step += 1;
        };

        self.state = RunnerState::Stopped(stop_reason);
        debug!(selections = ?self.selections, "Selection counts");
        info!(
            steps = self.steps,
            cumulative_reward = self.cumulative_reward,
            ?stop_reason,
            "Run stopped"
        );

        Ok(RunOutcome {
            steps: self.steps,
            cumulative_reward: self.cumulative_reward,
            stop_reason,
        })
    }

    pub fn mean_reward_per_step(&self) -> Option<f64> {
        (self.steps > 0).then(|| self.cumulative_reward / self.steps as f64)
    }

    pub fn optimal_arm_fraction(&self) -> Option<f64> {
        (self.steps > 0).then(|| self.selections[self.optimal_arm] as f64 / self.steps as f64)
    }

    pub fn selection_fractions(&self) -> Option<Vec<f64>> {
        (self.steps > 0).then(|| {
            self.selections
                .iter()
                .map(|&count| count as f64 / self.steps as f64)
                .collect()
        })
    }

    pub fn arms(&self) -> &[Box<dyn RewardSource>] {
        &self.arms
    }

    pub fn arm_stats(&self) -> Vec<ArmStats> {
        self.arms.iter().map(|arm| arm.stats()).collect()
    }

    pub fn selection_counts(&self) -> &[u64] {
        &self.selections
    }

    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    /// Mean reward per step after each step of the last run.
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{OptimisticConfig, ThompsonConfig, UcbConfig};

    const SEED: u64 = 1234;
    const TRUE_MEANS: [f64; 5] = [1.0, 2.0, 3.0, 10.0, 4.0];

    fn make_runner(source_type: SourceType, selection: SelectionPolicy) -> TrialRunner {
        TrialRunner::new(&source_type, &TRUE_MEANS, selection, Some(SEED)).unwrap()
    }

    #[test]
    fn create() {
        let runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        assert_eq!(runner.arms().len(), 5);
        assert_eq!(runner.optimal_arm(), 3);
        assert_eq!(runner.state(), RunnerState::Ready);
        assert_eq!(runner.mean_reward_per_step(), None);
        assert_eq!(runner.selection_fractions(), None);
    }

    #[test]
    fn create_empty() {
        let result = TrialRunner::new(&SourceType::Basic, &[], SelectionPolicy::Greedy, None);
        assert_eq!(result.err(), Some(ConfigurationError::NoArms));
    }

    #[test]
    fn create_invalid_mean() {
        let result = TrialRunner::new(
            &SourceType::Basic,
            &[1.0, f64::NAN],
            SelectionPolicy::Greedy,
            None,
        );
        assert!(matches!(
            result.err(),
            Some(ConfigurationError::InvalidTrueMean(1, _))
        ));
    }

    #[test]
    fn create_invalid_epsilon() {
        let result = TrialRunner::new(
            &SourceType::Basic,
            &TRUE_MEANS,
            SelectionPolicy::EpsilonGreedy { epsilon: 2.0 },
            None,
        );
        assert_eq!(result.err(), Some(ConfigurationError::EpsilonOutOfRange(2.0)));
    }

    #[test]
    fn optimal_arm_first_on_ties() {
        let runner = TrialRunner::new(
            &SourceType::Basic,
            &[1.0, 5.0, 5.0],
            SelectionPolicy::Greedy,
            None,
        )
        .unwrap();
        assert_eq!(runner.optimal_arm(), 1);
    }

    #[test]
    fn invalid_budgets() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        assert!(matches!(
            runner.run(0, 100.0),
            Err(SimulationError::Configuration(
                ConfigurationError::NonPositiveStepBudget
            ))
        ));
        assert!(matches!(
            runner.run(10, 0.0),
            Err(SimulationError::Configuration(
                ConfigurationError::NonPositiveRewardBudget(_)
            ))
        ));
        assert!(runner.run(10, -1.0).is_err());
        assert!(runner.run(10, f64::NAN).is_err());

        // nothing ran
        assert_eq!(runner.steps(), 0);
        assert_eq!(runner.state(), RunnerState::Ready);
    }

    #[test]
    fn step_budget() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        let outcome = runner.run(50, f64::INFINITY).unwrap();
        assert_eq!(outcome.steps, 50);
        assert_eq!(outcome.stop_reason, StopReason::StepBudget);
        assert_eq!(runner.state(), RunnerState::Stopped(StopReason::StepBudget));
    }

    #[test]
    fn reward_budget() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        let outcome = runner.run(10_000, 100.0).unwrap();
        assert!(outcome.steps < 10_000);
        assert!(outcome.cumulative_reward >= 100.0);
        assert_eq!(outcome.stop_reason, StopReason::RewardBudget);

        // the step before the last one was still below the budget
        let before_last = runner.trace()[outcome.steps as usize - 2] * (outcome.steps - 1) as f64;
        assert!(before_last < 100.0);
    }

    #[test]
    fn counters_consistent() {
        let mut runner = make_runner(
            SourceType::Basic,
            SelectionPolicy::EpsilonGreedy { epsilon: 0.2 },
        );
        let outcome = runner.run(300, f64::INFINITY).unwrap();

        assert_eq!(runner.selection_counts().iter().sum::<u64>(), outcome.steps);
        assert_eq!(
            runner.arms().iter().map(|arm| arm.pull_count()).sum::<u64>(),
            outcome.steps
        );
        assert_eq!(runner.trace().len() as u64, outcome.steps);

        let fractions = runner.selection_fractions().unwrap();
        assert!((fractions.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let mean = runner.mean_reward_per_step().unwrap();
        assert!((mean - outcome.cumulative_reward / outcome.steps as f64).abs() < 1e-12);
        assert_eq!(runner.trace().last().copied(), Some(mean));
    }

    #[test]
    fn rerun_resets_counters() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        runner.run(200, f64::INFINITY).unwrap();
        let outcome = runner.run(20, f64::INFINITY).unwrap();

        assert_eq!(outcome.steps, 20);
        assert_eq!(runner.selection_counts().iter().sum::<u64>(), 20);
        assert_eq!(
            runner.arms().iter().map(|arm| arm.pull_count()).sum::<u64>(),
            20
        );
    }

    #[test]
    fn arm_stats() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        let outcome = runner.run(100, f64::INFINITY).unwrap();
        let stats = runner.arm_stats();

        assert_eq!(stats.len(), 5);
        assert_eq!(stats[3].true_mean, 10.0);
        assert_eq!(
            stats.iter().map(|s| s.pulls).collect::<Vec<_>>(),
            runner.selection_counts()
        );
        assert_eq!(runner.cumulative_reward(), outcome.cumulative_reward);
    }

    #[test]
    fn greedy_scenario() {
        let mut runner = make_runner(SourceType::Basic, SelectionPolicy::Greedy);
        let outcome = runner.run(500, 3600.0).unwrap();

        assert!(outcome.steps <= 500);
        assert!(outcome.steps == 500 || outcome.cumulative_reward >= 3600.0);
    }

    #[test]
    fn optimistic_explores_every_arm() {
        let source_type = SourceType::Optimistic(OptimisticConfig {
            initial_estimate: 20.0,
        });
        let mut runner = make_runner(source_type, SelectionPolicy::Greedy);
        runner.run(500, 3600.0).unwrap();

        assert!(runner.selection_counts().iter().all(|&count| count > 0));
        assert!(runner.optimal_arm_fraction().unwrap() > 0.9);
    }

    #[test]
    fn ucb_tries_every_arm_first() {
        let source_type = SourceType::Ucb(UcbConfig {
            confidence_level: 0.6,
        });
        let mut runner = make_runner(source_type, SelectionPolicy::Greedy);

        runner.run(5, f64::INFINITY).unwrap();
        assert_eq!(runner.selection_counts(), &[1, 1, 1, 1, 1]);

        runner.run(500, 3600.0).unwrap();
        assert!(runner.optimal_arm_fraction().unwrap() > 0.9);
    }

    #[test]
    fn thompson_converges() {
        let source_type = SourceType::GaussianThompson(ThompsonConfig::default());
        let mut runner = make_runner(source_type, SelectionPolicy::Greedy);
        runner.run(500, f64::INFINITY).unwrap();

        assert!(runner.optimal_arm_fraction().unwrap() > 0.8);
    }

    #[test]
    fn seeded_runs_reproducible() {
        let selection = SelectionPolicy::EpsilonGreedy { epsilon: 0.3 };
        let mut a = make_runner(SourceType::Basic, selection);
        let mut b = make_runner(SourceType::Basic, selection);

        assert_eq!(
            a.run(100, f64::INFINITY).ok(),
            b.run(100, f64::INFINITY).ok()
        );
        assert_eq!(a.selection_counts(), b.selection_counts());
    }
}
