//! Domain layer - Core business logic with no platform dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (Message, Command, Reply, feeds)
//! - Traits: Abstractions for infrastructure (Bot, SourceFetcher)
//! - Rules: Network metric arithmetic and argument validation

pub mod entities;
pub mod traits;
pub mod rules;
