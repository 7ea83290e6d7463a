//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    /// A required source could not be fetched or decoded
    #[error("There was an error with {url} api.")]
    SourceUnavailable { url: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl CommandError {
    pub fn source_unavailable(url: impl Into<String>) -> Self {
        CommandError::SourceUnavailable { url: url.into() }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Why a single source fetch failed; logged, then collapsed into `FetchResult::Failure`
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid JSON body: {0}")]
    Body(#[from] serde_json::Error),
}

impl FetchError {
    /// Short label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request(e) if e.is_timeout() => "timeout",
            FetchError::Request(e) if e.is_connect() => "connect",
            FetchError::Request(_) => "transfer",
            FetchError::Status(_) => "status",
            FetchError::Body(_) => "body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_message() {
        let err = CommandError::source_unavailable("https://explorer.example/api/blocks");
        assert_eq!(err.to_string(), "There was an error with https://explorer.example/api/blocks api.");
    }

    #[test]
    fn test_body_error_kind() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err().into();
        assert_eq!(err.kind(), "body");
        assert_eq!(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY).kind(), "status");
    }
}
