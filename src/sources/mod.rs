mod basic;
pub mod errors;
mod gaussian_thompson;
mod optimistic;
mod rng;
mod source;
mod ucb;

pub use basic::Basic;
pub use gaussian_thompson::{GaussianThompson, ThompsonConfig, DEFAULT_PRIOR_PRECISION};
pub use optimistic::{Optimistic, OptimisticConfig};
pub use rng::MaybeSeededRng;
pub use source::{draw_reward, ArmStats, RewardSource, SourceType};
pub use ucb::{Ucb, UcbConfig, DEFAULT_CONFIDENCE_LEVEL};
