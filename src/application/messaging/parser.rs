//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, Content, MessageType, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Only accept `/cmd@username` mentions addressed to this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();
        let trimmed = text.trim();

        if trimmed.starts_with('/') || trimmed.starts_with(&self.command_prefix) {
            if let Some(content) = self.parse_command(trimmed) {
                return Message::new(chat_id, content)
                    .with_message_type(MessageType::Command)
                    .with_sender_opt(sender);
            }
        }

        Message::new(chat_id, Content::Text(text))
            .with_message_type(MessageType::Text)
            .with_sender_opt(sender)
    }

    /// Split `/name@bot arg1 arg2` into name and arguments
    fn parse_command(&self, text: &str) -> Option<Content> {
        let cmd_text = text
            .strip_prefix('/')
            .or_else(|| text.strip_prefix(self.command_prefix.as_str()))?;

        let mut parts = cmd_text.split_whitespace();
        let head = parts.next()?;

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if let Some(username) = &self.bot_username {
                    if !target.eq_ignore_ascii_case(username) {
                        return None;
                    }
                }
                name
            }
            None => head,
        };
        if name.is_empty() {
            return None;
        }

        Some(Content::Command {
            name: name.to_lowercase(),
            args: parts.map(|s| s.to_string()).collect(),
        })
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    /// Helper for MessageType
    pub fn with_message_type(mut self, mt: MessageType) -> Self {
        self.message_type = mt;
        self
    }
}
