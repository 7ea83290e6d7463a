//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Bot configuration, loaded once at start-up and shared read-only
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub adapters: AdaptersConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub endpoints: EndpointsConfig,
    pub params: ParamsConfig,
    pub texts: TextsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

/// Outbound HTTP settings for the source fetcher
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Skip TLS certificate verification. Insecure; only for endpoints
    /// with broken certificates.
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            accept_invalid_certs: false,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// JSON sources queried by the numeric commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointsConfig {
    pub blocks: String,
    pub rates: String,
    pub network: String,
    pub masternodes: String,
}

/// Static reward parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamsConfig {
    /// Miner reward per block
    pub mining_reward: f64,
    /// Masternode reward per block
    pub masternode_reward: f64,
    pub masternode_collateral: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "XSG".to_string()
}

/// Canned answers for each rejected numeric argument
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentTexts {
    pub default: String,
    pub infinity: String,
    pub zero: String,
    pub negative: String,
}

/// Static text blocks keyed by command
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextsConfig {
    pub help: Vec<String>,
    pub links: Vec<String>,
    pub roadmap: String,
    pub por: String,
    pub about: Vec<String>,
    pub calc: ArgumentTexts,
    pub mnrew: ArgumentTexts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "xsg-bot".to_string(),
                prefix: "/".to_string(),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
            },
            http: HttpConfig::default(),
            endpoints: EndpointsConfig {
                blocks: "https://explorer.snowgem.org/api/blocks?limit=100".to_string(),
                rates: "https://rates.snowgem.org/api/rates".to_string(),
                network: "https://explorer.snowgem.org/api/status?q=getInfo".to_string(),
                masternodes: "https://explorer.snowgem.org/api/masternodes".to_string(),
            },
            params: ParamsConfig {
                mining_reward: 7.5,
                masternode_reward: 5.25,
                masternode_collateral: 10_000.0,
                currency: default_currency(),
            },
            texts: TextsConfig {
                help: vec![
                    "*Available commands*".to_string(),
                    "/links - Official links".to_string(),
                    "/roadmap - Project roadmap".to_string(),
                    "/por - Proof of reserves".to_string(),
                    "/about - About XSG".to_string(),
                    "/calc <Sols/s> - Mining income estimate".to_string(),
                    "/network - Network status".to_string(),
                    "/halving - Next halving countdown".to_string(),
                    "/mninfo - Masternode statistics".to_string(),
                    "/mnrew [count] - Masternode reward projection".to_string(),
                ],
                links: vec![
                    "<a href=\"https://snowgem.org\">Website</a>".to_string(),
                    "<a href=\"https://explorer.snowgem.org\">Explorer</a>".to_string(),
                ],
                roadmap: "<a href=\"https://snowgem.org/roadmap\">Roadmap</a>".to_string(),
                por: "<a href=\"https://snowgem.org/por\">Proof of reserves</a>".to_string(),
                about: vec!["*XSG* is a community driven masternode coin.".to_string()],
                calc: ArgumentTexts {
                    default: "Usage: `/calc <hashrate in Sols/s>`".to_string(),
                    infinity: "With infinite hashrate you would mine every block. Nice try.".to_string(),
                    zero: "A hashrate of *0 Sols/s* mines nothing.".to_string(),
                    negative: "Hashrate cannot be negative.".to_string(),
                },
                mnrew: ArgumentTexts {
                    default: "Usage: `/mnrew [number of masternodes]`".to_string(),
                    infinity: "Infinite masternodes would own the whole network.".to_string(),
                    zero: "Zero masternodes earn zero rewards.".to_string(),
                    negative: "The number of masternodes cannot be negative.".to_string(),
                },
            },
        }
    }
}

impl Config {
    /// Load the YAML file, apply environment overrides and validate
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults plus environment overrides
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.set_token(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let tg = self.adapters.telegram.get_or_insert(TelegramConfig {
            enabled: true,
            token: None,
        });
        tg.token = Some(token.into());
        tg.enabled = true;
    }

    /// Telegram token, if the adapter is enabled
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoints = [
            ("endpoints.blocks", &self.endpoints.blocks),
            ("endpoints.rates", &self.endpoints.rates),
            ("endpoints.network", &self.endpoints.network),
            ("endpoints.masternodes", &self.endpoints.masternodes),
        ];
        for (field, url) in endpoints {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!("{} is not an http(s) URL: {}", field, url)));
            }
        }

        let params = [
            ("params.mining-reward", self.params.mining_reward),
            ("params.masternode-reward", self.params.masternode_reward),
            ("params.masternode-collateral", self.params.masternode_collateral),
        ];
        for (field, value) in params {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue(format!("{} must be positive, got {}", field, value)));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("http.timeout-secs must be at least 1".to_string()));
        }
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }

        Ok(())
    }
}
