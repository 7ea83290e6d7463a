//! Application services - Business logic orchestration

pub mod command_service;
pub mod formatter;
pub mod metrics_service;

pub use command_service::CommandService;
pub use metrics_service::MetricsService;
