mod comparison;
mod trial;

pub use comparison::{Comparison, ComparisonSettings, Experiment};
pub use trial::{RunOutcome, RunnerState, StopReason, TrialRunner};
