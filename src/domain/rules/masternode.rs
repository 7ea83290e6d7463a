use super::{SECONDS_PER_DAY, SECONDS_PER_MONTH, SECONDS_PER_WEEK, SECONDS_PER_YEAR};

/// Marker counted in the serialized masternode list
const ENABLED_MARKER: &str = "\"ENABLED\"";

// Empirical protocol constants, kept as observed on the network.
const ROI_BLOCKS_FACTOR: f64 = 3_153_600.0;
const ROI_DIVISOR: f64 = 10.0;
const PAYMENT_MINUTES_PER_NODE: f64 = 2.6;

/// Largest masternode count a reward projection is computed for
pub const MAX_PROJECTED_MASTERNODES: f64 = 1e9;

/// Number of active masternodes in a list payload
///
/// Counts occurrences of the literal `"ENABLED"` in the serialized JSON,
/// so a nested field carrying the same value is counted too.
pub fn count_enabled(payload: &serde_json::Value) -> usize {
    payload.to_string().matches(ENABLED_MARKER).count()
}

/// Figures derived from the active masternode count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasternodeStats {
    pub count: usize,
    pub roi_percent: f64,
    pub first_payment_hours: f64,
    pub daily_reward: f64,
}

impl MasternodeStats {
    /// `None` when there is no active node to share the reward
    pub fn compute(count: usize, masternode_reward: f64, avg_block_time: f64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self {
            count,
            roi_percent: masternode_reward * ROI_BLOCKS_FACTOR / avg_block_time / n / ROI_DIVISOR,
            first_payment_hours: PAYMENT_MINUTES_PER_NODE * n / 60.0,
            daily_reward: SECONDS_PER_DAY / avg_block_time * masternode_reward / n,
        })
    }
}

/// Expected rewards of `nodes` masternodes over standard periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardProjection {
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

impl RewardProjection {
    pub fn compute(nodes: f64, count: usize, masternode_reward: f64, avg_block_time: f64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let per = |period: f64| nodes * period / avg_block_time * masternode_reward / count as f64;
        Some(Self {
            day: per(SECONDS_PER_DAY),
            week: per(SECONDS_PER_WEEK),
            month: per(SECONDS_PER_MONTH),
            year: per(SECONDS_PER_YEAR),
        })
    }

    pub fn periods(&self) -> [(&'static str, f64); 4] {
        [
            ("day", self.day),
            ("week", self.week),
            ("month", self.month),
            ("year", self.year),
        ]
    }
}
