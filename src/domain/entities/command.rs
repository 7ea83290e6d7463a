use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::application::errors::CommandError;
use crate::domain::entities::{Message, Reply};

/// Command handler function type
pub type CommandHandler =
    Arc<dyn Fn(Message) -> BoxFuture<'static, Result<Reply, CommandError>> + Send + Sync>;

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Message) -> BoxFuture<'static, Result<Reply, CommandError>> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(input))
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    /// Commands sorted by name
    pub fn all(&self) -> Vec<&Command> {
        let mut all: Vec<&Command> = self.commands.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive_and_uses_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("help").with_aliases(vec!["start".to_string()]));
        registry.register(Command::new("calc"));

        assert_eq!(registry.find("CALC").map(|c| c.name.as_str()), Some("calc"));
        assert_eq!(registry.find("start").map(|c| c.name.as_str()), Some("help"));
        assert!(registry.find("mnrew").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_all_is_sorted() {
        let mut registry = CommandRegistry::new();
        for name in ["mnrew", "about", "halving"] {
            registry.register(Command::new(name));
        }
        let names: Vec<&str> = registry.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["about", "halving", "mnrew"]);
    }
}
