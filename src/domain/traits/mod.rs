//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod fetcher;

pub use bot::{Bot, BotInfo};
pub use fetcher::SourceFetcher;
