//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Http: Concurrent source fetching
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod http;
pub mod adapters;
