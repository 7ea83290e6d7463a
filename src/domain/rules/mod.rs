//! Network metric rules - pure arithmetic shared by every numeric command

pub mod argument;
pub mod block_time;
pub mod masternode;
pub mod network;

pub use argument::{parse_numeric_arg, NumericArg};
pub use block_time::{average_block_time, DEFAULT_BLOCK_TIME};
pub use masternode::{count_enabled, MasternodeStats, RewardProjection, MAX_PROJECTED_MASTERNODES};
pub use network::{HalvingCountdown, MiningYield, HALVING_HEIGHT};

pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
pub const SECONDS_PER_MONTH: f64 = 30.0 * SECONDS_PER_DAY;
pub const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_DAY;
