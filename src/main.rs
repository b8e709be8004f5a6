//! # Country News Bot
//!
//! A Telegram bot that gathers the latest headline links from a fixed set of
//! national news sites and translates them into the reader's language.
//!
//! ## Features
//!
//! - Six countries (Ukraine, USA, UK, Germany, Poland, China), five sites each
//! - Headlines found with one CSS rule per site, deduplicated and capped
//! - Broken or slow sites are logged and skipped instead of failing a request
//! - Reports translated into English, Ukrainian or Russian
//! - Long reports split into Telegram-sized messages
//!
//! ## Usage
//!
//! ```sh
//! TELEGRAM_BOT_TOKEN=123:abc country_news_bot -c ./bot.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Catalog**: the static country → sources table, selectors parsed at startup
//! 2. **Fetching**: front pages downloaded with bounded concurrency
//! 3. **Extraction**: `(title, link)` pairs pulled from each page
//! 4. **Aggregation**: per-source sections joined into one report
//! 5. **Delivery**: translation, chunking and the menu flow in [`bot`]

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod bot;
mod cli;
mod config;
mod models;
mod scrapers;
mod session;
mod translate;
mod utils;

use aggregate::Aggregator;
use bot::handlers::NewsBot;
use bot::telegram::TelegramClient;
use cli::Cli;
use config::Settings;
use scrapers::catalog::Catalog;
use scrapers::fetch::HttpFetcher;
use session::SessionStore;
use translate::GoogleTranslator;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("country_news_bot starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if args.token.trim().is_empty() {
        error!("Bot token is empty; set TELEGRAM_BOT_TOKEN or pass --token");
        return Err("missing bot token".into());
    }

    let settings = Settings::load(args.config.as_deref()).await?;
    debug!(?settings, "Effective settings");

    let catalog = Catalog::builtin()?;
    info!(countries = catalog.countries().count(), "Loaded news catalog");

    let fetcher = HttpFetcher::new(&settings.fetch)?;
    let aggregator = Aggregator::new(fetcher, catalog, settings.notices.clone(), &settings.fetch);
    let translator = GoogleTranslator::new(&settings.translation)?;
    let chat = TelegramClient::new(args.token.trim(), &settings.telegram)?;

    let news_bot = NewsBot::new(
        chat,
        aggregator,
        translator,
        SessionStore::new(),
        settings.telegram.chunk_chars,
    );

    bot::run(news_bot).await;

    info!("country_news_bot stopped");
    Ok(())
}
