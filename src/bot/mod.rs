//! Telegram front end.
//!
//! # Submodules
//!
//! - [`telegram`]: Bot API client and wire types
//! - [`handlers`]: the menu flow, from `/start` to delivered news
//! - [`keyboards`]: inline keyboards and callback data
//! - [`i18n`]: menu texts for English, Ukrainian and Russian
//!
//! # Flow
//!
//! ```text
//! /start ─► language menu ─► country menu ─► news + [Back | Refresh | Exit]
//!                 ▲                ▲                │      │        │
//!                 │                └────────────────┘      │        ▼
//!                 │                                  same country  Goodbye
//!                 └──────────────── Start again ◄──────────────────┘
//! ```

pub mod handlers;
pub mod i18n;
pub mod keyboards;
pub mod telegram;

use crate::scrapers::fetch::PageFetcher;
use crate::translate::Translator;
use handlers::NewsBot;
use std::time::Duration;
use telegram::TelegramClient;
use tracing::{debug, error, info, instrument, warn};

/// Pause after a failed `getUpdates` call before polling again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(3);

/// Long-poll Telegram and handle updates one at a time until Ctrl-C.
///
/// A failing handler is logged and does not stop the loop.
#[instrument(level = "info", skip_all)]
pub async fn run<F, T>(bot: NewsBot<TelegramClient, F, T>)
where
    F: PageFetcher,
    T: Translator,
{
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset = 0;
    info!("Polling for updates");

    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            result = bot.chat.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "getUpdates failed; retrying shortly");
                tokio::time::sleep(POLL_ERROR_PAUSE).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let update_id = update.update_id;
            if let Err(e) = bot.handle_update(update).await {
                error!(update_id, error = %e, "Failed to handle update");
            }
        }
        debug!(offset, users = bot.sessions().user_count(), "Poll cycle complete");
    }
}
