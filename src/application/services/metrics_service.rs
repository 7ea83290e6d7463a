//! Numeric commands: fetch the sources, derive the figures, format the reply

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::application::errors::CommandError;
use crate::application::services::formatter;
use crate::domain::entities::{BlocksFeed, FetchResult, NetworkInfoFeed, Rate, Reply};
use crate::domain::rules::{
    average_block_time, count_enabled, parse_numeric_arg, HalvingCountdown, MasternodeStats, MiningYield,
    NumericArg, RewardProjection, MAX_PROJECTED_MASTERNODES,
};
use crate::domain::traits::SourceFetcher;
use crate::infrastructure::config::{ArgumentTexts, Config};

/// Successful fetches, aligned with the URLs that produced them
struct Sources {
    urls: Vec<String>,
    results: Vec<FetchResult>,
}

impl Sources {
    fn decode<T: DeserializeOwned>(&self, index: usize) -> Result<T, CommandError> {
        self.results[index]
            .decode()
            .ok_or_else(|| CommandError::source_unavailable(&self.urls[index]))
    }

    fn value(&self, index: usize) -> Result<&serde_json::Value, CommandError> {
        self.results[index]
            .value()
            .ok_or_else(|| CommandError::source_unavailable(&self.urls[index]))
    }

    fn unavailable(&self, index: usize) -> CommandError {
        CommandError::source_unavailable(&self.urls[index])
    }

    /// Average block time of the blocks feed; a sample under two blocks counts as 60s
    fn block_time(&self, index: usize) -> Result<f64, CommandError> {
        let feed: BlocksFeed = self.decode(index)?;
        self.checked_block_time(index, &feed)
    }

    /// Latest height and average block time; the feed must hold a block
    fn height_and_block_time(&self, index: usize) -> Result<(u64, f64), CommandError> {
        let feed: BlocksFeed = self.decode(index)?;
        let height = feed.latest_height().ok_or_else(|| self.unavailable(index))?;
        Ok((height, self.checked_block_time(index, &feed)?))
    }

    fn checked_block_time(&self, index: usize, feed: &BlocksFeed) -> Result<f64, CommandError> {
        let avg = average_block_time(&feed.blocks);
        if !(avg > 0.0) {
            return Err(self.unavailable(index));
        }
        Ok(avg)
    }
}

/// Answers `calc`, `network`, `halving`, `mninfo` and `mnrew`
pub struct MetricsService {
    fetcher: Arc<dyn SourceFetcher>,
    config: Arc<Config>,
}

impl MetricsService {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Fetch every URL; the first failed one aborts the command
    async fn fetch_required(&self, urls: Vec<String>) -> Result<Sources, CommandError> {
        let results = self.fetcher.fetch_all(&urls).await;

        if let Some((url, _)) = urls.iter().zip(&results).find(|(_, r)| r.is_failure()) {
            return Err(CommandError::source_unavailable(url.as_str()));
        }
        if results.len() != urls.len() {
            return Err(CommandError::ExecutionFailed(format!(
                "fetcher returned {} results for {} sources",
                results.len(),
                urls.len()
            )));
        }

        Ok(Sources { urls, results })
    }

    fn price(&self, sources: &Sources, index: usize) -> Result<f64, CommandError> {
        let rates: Vec<Rate> = sources.decode(index)?;
        Rate::find_price(&rates, &self.config.params.currency).ok_or_else(|| sources.unavailable(index))
    }

    fn network_info(&self, sources: &Sources, index: usize) -> Result<NetworkInfoFeed, CommandError> {
        let feed: NetworkInfoFeed = sources.decode(index)?;
        if !(feed.info.networksolps > 0.0) {
            return Err(sources.unavailable(index));
        }
        Ok(feed)
    }

    pub async fn calc(&self, arg: Option<&str>) -> Result<Reply, CommandError> {
        let texts = &self.config.texts.calc;
        let user_solps = match parse_numeric_arg(arg) {
            NumericArg::Value(v) => v,
            rejected => return Ok(rejection(texts, rejected)),
        };

        let endpoints = &self.config.endpoints;
        let sources = self
            .fetch_required(vec![endpoints.blocks.clone(), endpoints.rates.clone(), endpoints.network.clone()])
            .await?;

        let avg_block_time = sources.block_time(0)?;
        let price = self.price(&sources, 1)?;
        let network = self.network_info(&sources, 2)?;

        let params = &self.config.params;
        let income = MiningYield::estimate(user_solps, network.info.networksolps, params.mining_reward, avg_block_time);
        let text = formatter::format_calc(user_solps, network.info.networksolps, &income, price, &params.currency);
        Ok(Reply::markdown(text).without_preview())
    }

    pub async fn network(&self) -> Result<Reply, CommandError> {
        let endpoints = &self.config.endpoints;
        let sources = self
            .fetch_required(vec![endpoints.blocks.clone(), endpoints.network.clone()])
            .await?;

        let (height, avg_block_time) = sources.height_and_block_time(0)?;
        let network = self.network_info(&sources, 1)?;

        let text = formatter::format_network(height, avg_block_time, network.info.networksolps, network.info.difficulty);
        Ok(Reply::markdown(text).without_preview())
    }

    pub async fn halving(&self) -> Result<Reply, CommandError> {
        let sources = self.fetch_required(vec![self.config.endpoints.blocks.clone()]).await?;

        let (height, avg_block_time) = sources.height_and_block_time(0)?;
        let countdown = HalvingCountdown::from_height(height, avg_block_time);

        Ok(Reply::markdown(formatter::format_halving(height, countdown.as_ref())).without_preview())
    }

    pub async fn mninfo(&self) -> Result<Reply, CommandError> {
        let endpoints = &self.config.endpoints;
        let sources = self
            .fetch_required(vec![endpoints.blocks.clone(), endpoints.masternodes.clone()])
            .await?;

        let avg_block_time = sources.block_time(0)?;
        let count = count_enabled(sources.value(1)?);

        let params = &self.config.params;
        let text = match MasternodeStats::compute(count, params.masternode_reward, avg_block_time) {
            Some(stats) => formatter::format_mninfo(&stats, params.masternode_collateral, &params.currency),
            None => formatter::no_masternodes(),
        };
        Ok(Reply::markdown(text).without_preview())
    }

    /// Reward projection for `arg` masternodes, one when omitted
    pub async fn mnrew(&self, arg: Option<&str>) -> Result<Reply, CommandError> {
        let texts = &self.config.texts.mnrew;
        let nodes = match parse_numeric_arg(arg) {
            NumericArg::Absent => 1.0,
            NumericArg::Value(v) if v > MAX_PROJECTED_MASTERNODES => return Ok(rejection(texts, NumericArg::Infinity)),
            NumericArg::Value(v) => v,
            rejected => return Ok(rejection(texts, rejected)),
        };

        let endpoints = &self.config.endpoints;
        let sources = self
            .fetch_required(vec![endpoints.blocks.clone(), endpoints.rates.clone(), endpoints.masternodes.clone()])
            .await?;

        let avg_block_time = sources.block_time(0)?;
        let price = self.price(&sources, 1)?;
        let count = count_enabled(sources.value(2)?);

        let params = &self.config.params;
        let text = match RewardProjection::compute(nodes, count, params.masternode_reward, avg_block_time) {
            Some(projection) => formatter::format_mnrew(nodes, &projection, price, &params.currency),
            None => formatter::no_masternodes(),
        };
        Ok(Reply::markdown(text).without_preview())
    }
}

/// Canned answer for an argument that does not lead to a computation
fn rejection(texts: &ArgumentTexts, arg: NumericArg) -> Reply {
    let text = match arg {
        NumericArg::Infinity => &texts.infinity,
        NumericArg::Zero => &texts.zero,
        NumericArg::Negative => &texts.negative,
        NumericArg::Absent | NumericArg::NotANumber | NumericArg::Value(_) => &texts.default,
    };
    Reply::markdown(text.clone()).without_preview()
}
