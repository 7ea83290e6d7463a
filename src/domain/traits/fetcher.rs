use async_trait::async_trait;
use crate::domain::entities::FetchResult;

/// Fetches a set of JSON sources concurrently
///
/// Implementations never fail outright: the returned list has one entry per
/// requested URL, in request order, with `FetchResult::Failure` standing in
/// for any source that could not be retrieved or parsed.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_all(&self, urls: &[String]) -> Vec<FetchResult>;
}
