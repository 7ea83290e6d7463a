use clap::{Parser, Subcommand};
use std::sync::Arc;

use xsg_bot::application::errors::{BotError, ConfigError};
use xsg_bot::application::messaging::{MessageDispatcher, MessageParser};
use xsg_bot::application::services::{CommandService, MetricsService};
use xsg_bot::domain::traits::Bot;
use xsg_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use xsg_bot::infrastructure::config::Config;
use xsg_bot::infrastructure::http::HttpFetcher;

/// Long-poll timeout for getUpdates
const POLL_TIMEOUT_SECS: i64 = 30;

#[derive(Parser)]
#[command(name = "xsg-bot")]
#[command(about = "XSG network statistics chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Run a single command and print the reply
    Ask {
        /// Command name without the slash
        command: String,
        /// Command arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("xsg-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::Ask { command, args } => ask(&cli.config, &command, &args),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Load and validate the configuration; missing settings stop start-up
fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, ConfigError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        tracing::warn!("Config file {} not found, using defaults", config_path);
        let config = Config::load_env();
        config.validate()?;
        config
    };

    if let Some(token) = token_override {
        config.set_token(token);
    }

    Ok(config)
}

fn build_dispatcher(config: Arc<Config>, bot_username: Option<&str>) -> Result<MessageDispatcher, BotError> {
    let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
    let metrics = Arc::new(MetricsService::new(fetcher, config.clone()));

    let mut commands = CommandService::new(&config.bot.prefix);
    commands.register_defaults(&config);
    commands.register_metrics(metrics);

    let mut parser = MessageParser::new(&config.bot.prefix);
    if let Some(username) = bot_username {
        parser = parser.with_bot_username(username);
    }

    Ok(MessageDispatcher::new(parser, commands))
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = Arc::new(load_config(config_path, token_override)?);
    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;

    match config.telegram_token() {
        Some(token) => {
            let bot = TelegramAdapter::new(token);
            rt.block_on(run_telegram_bot(bot, config.clone()))
        }
        None => {
            // Run console bot (dev mode)
            let dispatcher = build_dispatcher(config.clone(), None)?;
            rt.block_on(async { run_console_bot(ConsoleAdapter::new(), dispatcher).await });
            Ok(())
        }
    }
}

async fn run_telegram_bot(mut bot: TelegramAdapter, config: Arc<Config>) -> Result<(), BotError> {
    bot.start().await?;
    bot.fetch_bot_info().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let dispatcher = Arc::new(build_dispatcher(config, Some(&info.username))?);
    if let Err(e) = bot.register_commands(&dispatcher.commands().descriptions()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let bot = Arc::new(bot);
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        let updates = tokio::select! {
            updates = bot.get_updates(offset, POLL_TIMEOUT_SECS) => updates,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::debug!("Received {} updates", updates.len());
                }
                offset = TelegramAdapter::get_next_offset(&updates, offset);

                for update in updates {
                    let Some(msg) = update.message else { continue };
                    let Some(text) = msg.text else { continue };

                    let update_id = update.update_id;
                    let chat_id = msg.chat.id.to_string();
                    let sender = msg.from.as_ref().map(|u| u.to_domain());

                    let bot = bot.clone();
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(async move {
                        let result = match dispatcher.process_text(&chat_id, text, sender).await {
                            Ok(Some(reply)) => bot.send_reply(&chat_id, &reply).await.map(|_| ()),
                            Ok(None) => Ok(()),
                            Err(e) => Err(e),
                        };

                        if let Err(e) = result {
                            tracing::warn!("Update {} (chat {}) caused error {}", update_id, chat_id, e);
                        }
                    });
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: ConsoleAdapter, dispatcher: MessageDispatcher) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    while let Some(input) = bot.read_line("> ").await {
        if input.is_empty() {
            continue;
        }

        match dispatcher.process_text("console", input.as_str(), None).await {
            Ok(Some(reply)) => {
                let _ = bot.send_reply("console", &reply).await;
            }
            Ok(None) => {
                println!("Commands start with {}, try {}help", dispatcher.commands().prefix(), dispatcher.commands().prefix());
            }
            Err(e) => {
                tracing::warn!("Input {:?} caused error {}", input, e);
            }
        }
    }
}

/// One-shot command against the configured sources
fn ask(config_path: &str, command: &str, args: &[String]) -> Result<(), BotError> {
    let config = Arc::new(load_config(config_path, None)?);
    let dispatcher = build_dispatcher(config, None)?;

    let text = format!("/{} {}", command.trim_start_matches('/'), args.join(" "));
    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;

    match rt.block_on(dispatcher.process_text("console", text, None))? {
        Some(reply) => println!("{}", reply.text),
        None => println!("No reply"),
    }
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\n# Save this to config.yaml and adjust as needed.");
    Ok(())
}
