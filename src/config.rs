//! Runtime settings loaded from an optional YAML file.
//!
//! Every field has a default, so the file only needs the values an operator
//! wants to change:
//!
//! ```yaml
//! fetch:
//!   timeout_secs: 10
//!   concurrency: 2
//! notices:
//!   unknown_country: "No news for this country."
//! ```
//!
//! The bot token is not part of this file; it comes from the command line or
//! the `TELEGRAM_BOT_TOKEN` environment variable (see [`crate::cli`]).

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub telegram: TelegramSettings,
    pub translation: TranslationSettings,
    pub notices: Notices,
}

/// How news pages are downloaded and how much is kept from each.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    /// Some sites reject requests without a browser-like agent.
    pub user_agent: String,
    /// Pages fetched at once for one country; `1` fetches strictly in order.
    pub concurrency: usize,
    pub headline_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
            concurrency: 4,
            headline_limit: crate::scrapers::extract::DEFAULT_HEADLINE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramSettings {
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
    /// Maximum characters per outgoing message.
    pub chunk_chars: usize,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org/".to_string(),
            poll_timeout_secs: 30,
            chunk_chars: 4000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Longest piece of text sent in a single translation request.
    pub max_request_chars: usize,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 15,
            max_request_chars: 4000,
        }
    }
}

/// Fixed replies used instead of a report.
///
/// They are written in one language and then go through translation like any
/// other report text. The defaults are Russian.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Notices {
    pub unknown_country: String,
    pub no_news: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            unknown_country: "Нет новостей для этой страны.".to_string(),
            no_news: "Нет доступных новостей для этой страны.".to_string(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from `path`, or use the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        let settings =
            Self::from_yaml(&yaml).map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(settings)
    }
}
