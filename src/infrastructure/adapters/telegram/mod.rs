//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::Reply;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl User {
    pub fn to_domain(&self) -> crate::domain::entities::User {
        crate::domain::entities::User::new(self.id.to_string())
            .with_username(self.username.as_deref())
            .with_first_name(self.first_name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Network(format!(
                "Telegram API error: {}",
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "xsg-bot".to_string(),
                username: "xsg_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn call<Req, Res>(&self, method: &str, request: &Req, timeout: Option<Duration>) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized,
        Res: for<'de> Deserialize<'de>,
    {
        let mut builder = self.client.post(self.api_url(method)).json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let data: ApiResponse<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({})", e, status)))?;

        data.into_result()
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({}), None).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Long-poll updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        // HTTP timeout must outlast the long poll
        let http_timeout = Duration::from_secs(timeout.max(0) as u64 + 10);
        self.call("getUpdates", &request, Some(http_timeout)).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Send a message with specific parse mode
    pub async fn send_message_with_format(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
        disable_preview: bool,
    ) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
            disable_web_page_preview: bool,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            disable_web_page_preview: disable_preview,
        };

        let data: MessageResult = self.call("sendMessage", &request, None).await?;
        Ok(data.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|(command, description)| Command { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request, None).await?;
        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", &self.token[..8.min(self.token.len())]);
        Ok(())
    }

    /// Send with the reply's parse mode, falling back to plain text if Telegram rejects the markup
    async fn send_reply(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, reply.text);

        let formatted = self
            .send_message_with_format(chat_id, &reply.text, Some(reply.parse_mode.as_str()), reply.disable_preview)
            .await;

        match formatted {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::warn!("{} failed, using plain text: {}", reply.parse_mode.as_str(), e);
                self.send_message_with_format(chat_id, &reply.text, None, reply.disable_preview).await
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_updates() {
        let body = r#"{"ok":true,"result":[
            {"update_id":10,"message":{"message_id":1,"from":{"id":5,"username":"alice"},"chat":{"id":-100},"text":"/calc 10"}},
            {"update_id":11,"edited_message":{}}
        ]}"#;
        let data: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = data.into_result().unwrap();

        assert_eq!(updates.len(), 2);
        let msg = updates[0].message.as_ref().unwrap();
        assert_eq!(msg.text.as_deref(), Some("/calc 10"));
        assert_eq!(msg.from.as_ref().unwrap().to_domain().display_name(), "alice");
        assert!(updates[1].message.is_none());
        assert_eq!(TelegramAdapter::get_next_offset(&updates, 0), 12);
    }

    #[test]
    fn test_next_offset_keeps_current_when_idle() {
        assert_eq!(TelegramAdapter::get_next_offset(&[], 42), 42);
    }

    #[test]
    fn test_api_error_envelope() {
        let data: ApiResponse<bool> =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities"}"#).unwrap();
        let err = data.into_result().unwrap_err();
        assert!(err.to_string().contains("can't parse entities"));
    }

    #[test]
    fn test_api_url() {
        let adapter = TelegramAdapter::new("123:abc");
        assert_eq!(adapter.api_url("getMe"), "https://api.telegram.org/bot123:abc/getMe");
    }
}
