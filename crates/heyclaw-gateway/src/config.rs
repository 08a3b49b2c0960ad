use anyhow::Context;
use heyclaw_channel::{ApiConfig, BotInfo};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[bot]
bot_id = ""
token = ""  # Set via HEYBOX_BOT_TOKEN env var

[api]
send_url = "https://chat.xiaoheihe.cn/chatroom/v2/channel_msg/send"
upload_url = "https://chat-upload.xiaoheihe.cn/upload"
chat_version = "1.22.2"
timeout_secs = 30

[logging]
level = "info"  # trace, debug, info, warn, error
json = false
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bot: BotInfo,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.heyclaw/heyclaw.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".heyclaw").join("heyclaw.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
            eprintln!("Please edit this file or set environment variables.");
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.heyclaw/heyclaw.toml (auto-created if missing)
    /// 2. Local override: ./heyclaw.toml (workspace, optional)
    /// 3. Environment variables (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("heyclaw").required(false))
            .add_source(config::Environment::with_prefix("HEYCLAW").separator("__"));

        if let Ok(token) = env::var("HEYBOX_BOT_TOKEN") {
            config_builder = config_builder.set_override("bot.token", token)?;
        }

        let config = config_builder.build()?;

        let config: Self = config.try_deserialize()?;
        if config.bot.token.is_empty() {
            anyhow::bail!(
                "Heybox bot token is empty. Set HEYBOX_BOT_TOKEN or edit ~/.heyclaw/heyclaw.toml"
            );
        }
        Ok(config)
    }
}
