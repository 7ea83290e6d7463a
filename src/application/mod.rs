//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command registry, metric commands, reply formatting
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
