//! Message dispatcher - Routes messages to command handlers

use crate::application::errors::{BotError, CommandError};
use crate::application::services::CommandService;
use crate::domain::entities::{Message, Reply, User};
use super::parser::MessageParser;

/// Handler result
pub type HandlerResult = Result<Option<Reply>, BotError>;

/// Message dispatcher - parses raw text and runs the matching command
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(parser: MessageParser, commands: CommandService) -> Self {
        Self { parser, commands }
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Process a raw text message
    pub async fn process_text(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> HandlerResult {
        let message = self.parser.parse(chat_id, text, sender);
        self.process(message).await
    }

    /// Run a parsed message; plain text is ignored
    ///
    /// Expected failures become replies: unknown commands and unavailable
    /// sources. Anything else is returned to the caller to be logged.
    pub async fn process(&self, message: Message) -> HandlerResult {
        if !message.content.is_command() {
            return Ok(None);
        }

        tracing::debug!(
            "[{}] message {} from {} at {}",
            message.chat_id,
            message.id,
            message.sender.as_ref().map(|u| u.display_name()).unwrap_or("unknown"),
            message.timestamp.to_rfc3339()
        );

        match self.commands.handle(&message).await {
            Ok(reply) => Ok(reply),
            Err(CommandError::NotFound(name)) => {
                Ok(Some(Reply::markdown(format!("Unknown command: /{}", name))))
            }
            Err(e @ CommandError::SourceUnavailable { .. }) => {
                tracing::warn!("[{}] {}", message.chat_id, e);
                Ok(Some(Reply::markdown(e.to_string()).without_preview()))
            }
            Err(e) => Err(BotError::Command(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::MetricsService;
    use crate::domain::entities::FetchResult;
    use crate::domain::traits::SourceFetcher;
    use crate::infrastructure::config::Config;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct DownFetcher;

    #[async_trait]
    impl SourceFetcher for DownFetcher {
        async fn fetch_all(&self, urls: &[String]) -> Vec<FetchResult> {
            vec![FetchResult::Failure; urls.len()]
        }
    }

    fn dispatcher() -> MessageDispatcher {
        let config = Arc::new(Config::default());
        let mut commands = CommandService::new("/");
        commands.register_defaults(&config);
        commands.register_metrics(Arc::new(MetricsService::new(Arc::new(DownFetcher), config.clone())));
        MessageDispatcher::new(MessageParser::new("/"), commands)
    }

    #[tokio::test]
    async fn test_source_failure_becomes_reply() {
        let reply = dispatcher().process_text("1", "/network", None).await.unwrap().unwrap();
        let blocks = Config::default().endpoints.blocks;
        assert_eq!(reply.text, format!("There was an error with {} api.", blocks));
        assert!(reply.disable_preview);
    }

    #[tokio::test]
    async fn test_unknown_command_reply() {
        let reply = dispatcher().process_text("1", "/wen", None).await.unwrap().unwrap();
        assert_eq!(reply.text, "Unknown command: /wen");
    }

    #[tokio::test]
    async fn test_plain_text_is_ignored() {
        assert!(dispatcher().process_text("1", "gm", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_argument_rejection_needs_no_sources() {
        let reply = dispatcher().process_text("1", "/calc -3", None).await.unwrap().unwrap();
        assert_eq!(reply.text, Config::default().texts.calc.negative);
    }
}
