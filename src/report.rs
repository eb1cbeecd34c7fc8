use crate::errors::ReportError;
use crate::runner::ComparisonSettings;
use crate::selection::SelectionPolicy;
use crate::sources::{RewardSource, SourceType};

use serde::Serialize;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Metrics of one experiment, averaged over its repetitions.
#[derive(Debug, Serialize)]
pub struct ExperimentReport {
    pub id: Uuid,
    pub name: String,
    pub source: SourceType,
    pub selection: SelectionPolicy,
    pub repetitions: u32,
    pub optimal_arm: usize,
    pub mean_steps: f64,
    pub mean_cumulative_reward: f64,
    pub mean_reward_per_step: f64,
    pub optimal_arm_fraction: f64,
    pub selection_fractions: Vec<f64>,
    pub last_trace: Vec<f64>,
    pub last_arms: Vec<Box<dyn RewardSource>>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: u128,
    pub settings: ComparisonSettings,
    pub experiments: Vec<ExperimentReport>,
}

impl Report {
    pub fn new(settings: ComparisonSettings, experiments: Vec<ExperimentReport>) -> Self {
        Self {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            settings,
            experiments,
        }
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
