use super::{SECONDS_PER_DAY, SECONDS_PER_HOUR};

/// Block height at which the mining reward halves
pub const HALVING_HEIGHT: u64 = 2_102_400;

const DAYS_PER_YEAR: f64 = 365.0;

/// Expected mining income for a given hash rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningYield {
    pub per_hour: f64,
    pub per_day: f64,
}

impl MiningYield {
    /// `user / network * t * reward / avg_block_time` for t = one hour and one day
    pub fn estimate(user_solps: f64, network_solps: f64, mining_reward: f64, avg_block_time: f64) -> Self {
        let per_second = user_solps / network_solps * mining_reward / avg_block_time;
        Self {
            per_hour: per_second * SECONDS_PER_HOUR,
            per_day: per_second * SECONDS_PER_DAY,
        }
    }
}

/// Time left until the next reward halving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalvingCountdown {
    pub blocks_left: u64,
    pub days: f64,
    pub years: f64,
}

impl HalvingCountdown {
    /// Countdown from `height`, or `None` once the halving height is reached
    pub fn from_height(height: u64, avg_block_time: f64) -> Option<Self> {
        let blocks_left = HALVING_HEIGHT.checked_sub(height).filter(|&b| b > 0)?;
        let days = blocks_left as f64 * avg_block_time / SECONDS_PER_DAY;
        Some(Self {
            blocks_left,
            days,
            years: days / DAYS_PER_YEAR,
        })
    }
}
