use std::sync::Arc;

use futures::FutureExt;

use crate::application::errors::CommandError;
use crate::application::services::MetricsService;
use crate::domain::entities::{Command, CommandRegistry, Content, Message, Reply};
use crate::infrastructure::config::Config;

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Commands answered with static text from the configuration
    pub fn register_defaults(&mut self, config: &Config) {
        let texts = &config.texts;

        self.register(static_command("help", "Show help message", Reply::markdown(texts.help.join("\n")))
            .with_aliases(vec!["start".to_string()])
            .with_usage("/help [command]"));
        self.register(static_command("links", "Official links", Reply::html(texts.links.join("\n")).without_preview()));
        self.register(static_command("roadmap", "Project roadmap", Reply::html(texts.roadmap.clone()).without_preview()));
        self.register(static_command("por", "Proof of reserves", Reply::html(texts.por.clone()).without_preview()));
        self.register(static_command("about", "About the project", Reply::markdown(texts.about.join("\n")).without_preview()));
        self.register(static_command(
            "version",
            "Show bot version",
            Reply::markdown(format!("{} v{}", config.bot.name, env!("CARGO_PKG_VERSION"))),
        ));
    }

    /// Commands computed from the live sources
    pub fn register_metrics(&mut self, metrics: Arc<MetricsService>) {
        let svc = metrics.clone();
        self.register(Command::new("calc")
            .with_description("Estimate mining income for a hashrate")
            .with_usage("/calc <Sols/s>")
            .with_handler(move |msg| {
                let svc = svc.clone();
                async move { svc.calc(first_arg(&msg)).await }.boxed()
            }));

        let svc = metrics.clone();
        self.register(Command::new("network")
            .with_description("Show network status")
            .with_handler(move |_| {
                let svc = svc.clone();
                async move { svc.network().await }.boxed()
            }));

        let svc = metrics.clone();
        self.register(Command::new("halving")
            .with_description("Show the next halving countdown")
            .with_handler(move |_| {
                let svc = svc.clone();
                async move { svc.halving().await }.boxed()
            }));

        let svc = metrics.clone();
        self.register(Command::new("mninfo")
            .with_description("Show masternode statistics")
            .with_handler(move |_| {
                let svc = svc.clone();
                async move { svc.mninfo().await }.boxed()
            }));

        let svc = metrics;
        self.register(Command::new("mnrew")
            .with_description("Project masternode rewards")
            .with_usage("/mnrew [masternodes]")
            .with_handler(move |msg| {
                let svc = svc.clone();
                async move { svc.mnrew(first_arg(&msg)).await }.boxed()
            }));
    }

    pub async fn handle(&self, message: &Message) -> Result<Option<Reply>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        // `/help <command>` describes a single command
        if cmd.name == "help" {
            if let Some(topic) = args.first() {
                return Ok(Some(Reply::markdown(self.get_help(Some(topic)))));
            }
        }

        tracing::debug!("Running /{} with args {:?}", cmd.name, args);
        match &cmd.handler {
            Some(handler) => Ok(Some(handler(message.clone()).await?)),
            None => Ok(Some(Reply::markdown(format!("Command {} not implemented", cmd.name)))),
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            let name = name.trim_start_matches('/');
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("/{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command /{} not found", name);
        }

        let mut help = "Available commands:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  /{} - {}\n", cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }

    /// Name/description pairs for platform command menus
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.registry
            .all()
            .into_iter()
            .map(|c| (c.name.clone(), c.description.clone().unwrap_or_default()))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

fn first_arg(message: &Message) -> Option<&str> {
    message.content.args().first().map(String::as_str)
}

fn static_command(name: &str, description: &str, reply: Reply) -> Command {
    Command::new(name)
        .with_description(description)
        .with_handler(move |_| futures::future::ready(Ok(reply.clone())).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ParseMode;

    fn service() -> CommandService {
        let mut commands = CommandService::new("/");
        commands.register_defaults(&Config::default());
        commands
    }

    #[tokio::test]
    async fn test_static_commands() {
        let config = Config::default();
        let commands = service();

        let reply = commands.handle(&Message::from_command("1", "help", vec![])).await.unwrap().unwrap();
        assert_eq!(reply.text, config.texts.help.join("\n"));
        assert_eq!(reply.parse_mode, ParseMode::Markdown);
        assert!(!reply.disable_preview);

        let reply = commands.handle(&Message::from_command("1", "Links", vec![])).await.unwrap().unwrap();
        assert_eq!(reply.parse_mode, ParseMode::Html);
        assert!(reply.disable_preview);

        let reply = commands.handle(&Message::from_command("1", "start", vec![])).await.unwrap().unwrap();
        assert_eq!(reply.text, config.texts.help.join("\n"));
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let commands = service();
        let reply = commands
            .handle(&Message::from_command("1", "help", vec!["/help".to_string()]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.text, "/help - Show help message\nUsage: /help [command]");
    }

    #[tokio::test]
    async fn test_unknown_command_and_plain_text() {
        let commands = service();
        let err = commands.handle(&Message::from_command("1", "moon", vec![])).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound(name) if name == "moon"));

        assert!(commands.handle(&Message::from_text("1", "hello")).await.unwrap().is_none());
    }

    #[test]
    fn test_descriptions_are_sorted() {
        let names: Vec<String> = service().descriptions().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["about", "help", "links", "por", "roadmap", "version"]);
    }
}
