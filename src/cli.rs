//! Command-line interface definitions.
//!
//! The bot token can be given as a flag or through the environment; startup
//! fails without it.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the news bot.
///
/// # Examples
///
/// ```sh
/// # Token from the environment, default settings
/// TELEGRAM_BOT_TOKEN=123:abc country_news_bot
///
/// # Explicit token and a settings file
/// country_news_bot --token 123:abc -c ./bot.yaml
/// ```
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("token", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}
