use crate::domain::entities::Block;

/// Block time assumed when the sample holds fewer than two blocks
pub const DEFAULT_BLOCK_TIME: f64 = 60.0;

/// Mean seconds between consecutive blocks of a newest-first sample
///
/// Zero or negative when the sample is flat or out of order, NaN when the
/// timestamp span overflows; callers must reject anything not positive.
pub fn average_block_time(blocks: &[Block]) -> f64 {
    match (blocks.first(), blocks.last()) {
        (Some(newest), Some(oldest)) if blocks.len() > 1 => match newest.time.checked_sub(oldest.time) {
            Some(span) => span as f64 / (blocks.len() - 1) as f64,
            None => f64::NAN,
        },
        _ => DEFAULT_BLOCK_TIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(times: &[i64]) -> Vec<Block> {
        times
            .iter()
            .enumerate()
            .map(|(i, &time)| Block { time, height: 100 - i as u64 })
            .collect()
    }

    #[test]
    fn test_degenerate_samples_use_default() {
        assert_eq!(average_block_time(&[]), 60.0);
        assert_eq!(average_block_time(&blocks(&[1000])), 60.0);
    }

    #[test]
    fn test_average_over_sample() {
        assert_eq!(average_block_time(&blocks(&[1000, 940, 880])), 60.0);
        // only the endpoints matter
        assert_eq!(average_block_time(&blocks(&[1000, 999, 700])), 150.0);
        assert_eq!(average_block_time(&blocks(&[1000, 995])), 5.0);
    }

    #[test]
    fn test_flat_reversed_and_overflowing_samples() {
        assert_eq!(average_block_time(&blocks(&[1000, 1000])), 0.0);
        assert_eq!(average_block_time(&blocks(&[900, 1000])), -100.0);
        assert!(average_block_time(&blocks(&[i64::MAX, i64::MIN])).is_nan());
    }
}
