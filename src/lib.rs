pub mod config;
pub mod errors;
pub mod report;
pub mod runner;
pub mod selection;
pub mod sources;

pub use errors::{ConfigurationError, SimulationError};
pub use runner::{RunOutcome, TrialRunner};
pub use selection::SelectionPolicy;
pub use sources::{RewardSource, SourceType};
