//! Roulette domain: bet types, the wheel, and the bet evaluator.

pub mod evaluator;
pub mod types;
pub mod wheel;

pub use evaluator::{evaluate, net_payout, total_staked};
pub use types::*;
pub use wheel::{RandomWheel, WinningNumberSource, MAX_POCKET};
