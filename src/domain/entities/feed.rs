//! Results of source fetches and the payload shapes the bot expects

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Outcome of fetching one source URL
///
/// Every failure mode (connect, HTTP status, malformed body, timeout)
/// collapses into `Failure`; the cause is logged by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Success(serde_json::Value),
    Failure,
}

impl FetchResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchResult::Failure)
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            FetchResult::Success(value) => Some(value),
            FetchResult::Failure => None,
        }
    }

    /// Decode the payload into a typed feed, `None` on failure or shape mismatch
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.value()?;
        match T::deserialize(value) {
            Ok(feed) => Some(feed),
            Err(e) => {
                tracing::warn!("Unexpected payload shape: {}", e);
                None
            }
        }
    }
}

/// One entry of the block explorer feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub time: i64,
    pub height: u64,
}

/// Block explorer feed, newest block first
#[derive(Debug, Clone, Deserialize)]
pub struct BlocksFeed {
    pub blocks: Vec<Block>,
}

impl BlocksFeed {
    pub fn latest_height(&self) -> Option<u64> {
        self.blocks.first().map(|b| b.height)
    }
}

/// One entry of the exchange-rate feed
#[derive(Debug, Clone, Deserialize)]
pub struct Rate {
    pub code: String,
    pub price: String,
}

impl Rate {
    /// USD price of `code` in a rates feed, `None` unless it is a finite number
    pub fn find_price(rates: &[Rate], code: &str) -> Option<f64> {
        rates
            .iter()
            .find(|r| r.code == code)
            .and_then(|r| r.price.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NetworkInfo {
    pub networksolps: f64,
    pub difficulty: f64,
}

/// Network status feed
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NetworkInfoFeed {
    pub info: NetworkInfo,
}
