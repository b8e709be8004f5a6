//! Update handling: the language → country → news menu flow.

use super::i18n::{self, LANGUAGE_PROMPT, texts};
use super::keyboards::{self, Callback};
use super::telegram::{CallbackQuery, ChatApi, ChatId, Message, Update};
use crate::aggregate::Aggregator;
use crate::models::Language;
use crate::scrapers::fetch::PageFetcher;
use crate::session::{SessionStore, UserId};
use crate::translate::{Translator, translate_text};
use crate::utils::chunk_message;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// The message a callback button was attached to.
#[derive(Debug, Clone, Copy)]
struct MessageRef {
    chat_id: ChatId,
    message_id: i64,
}

impl From<&Message> for MessageRef {
    fn from(message: &Message) -> Self {
        Self {
            chat_id: message.chat.id,
            message_id: message.message_id,
        }
    }
}

pub struct NewsBot<C, F, T> {
    pub(super) chat: C,
    aggregator: Aggregator<F>,
    translator: T,
    sessions: SessionStore,
    chunk_chars: usize,
}

impl<C, F, T> NewsBot<C, F, T>
where
    C: ChatApi,
    F: PageFetcher,
    T: Translator,
{
    pub fn new(
        chat: C,
        aggregator: Aggregator<F>,
        translator: T,
        sessions: SessionStore,
        chunk_chars: usize,
    ) -> Self {
        Self {
            chat,
            aggregator,
            translator,
            sessions,
            chunk_chars,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[instrument(level = "info", skip_all, fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: Update) -> Result<(), Box<dyn Error>> {
        if let Some(query) = update.callback_query {
            return self.on_callback(query).await;
        }
        if let Some(message) = update.message {
            return self.on_message(message).await;
        }
        debug!("Ignoring update without message or callback");
        Ok(())
    }

    async fn on_message(&self, message: Message) -> Result<(), Box<dyn Error>> {
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        if command_name(text) != Some("start") {
            debug!("Ignoring non-command message");
            return Ok(());
        }

        if let Some(user) = &message.from {
            let language = Language::detect(user.language_code.as_deref());
            self.sessions.set_language(user.id, language);
            info!(user = user.id, ?language, "Started conversation");
        }
        self.show_language_menu(message.chat.id).await
    }

    async fn on_callback(&self, query: CallbackQuery) -> Result<(), Box<dyn Error>> {
        self.chat.answer_callback_query(&query.id).await?;

        let Some(message) = query.message.as_ref() else {
            debug!("Callback without an accessible message");
            return Ok(());
        };
        let Some(callback) = query.data.as_deref().and_then(Callback::parse) else {
            debug!(data = ?query.data, "Ignoring unknown callback");
            return Ok(());
        };

        let user = query.from.id;
        let target = MessageRef::from(message);
        debug!(user, ?callback, "Handling callback");

        match callback {
            Callback::StartAgain => {
                let language = Language::detect(query.from.language_code.as_deref());
                self.sessions.set_language(user, language);
                self.show_language_menu(target.chat_id).await
            }
            Callback::Language(language) => {
                self.sessions.set_language(user, language);
                self.show_country_menu(target, language).await
            }
            Callback::Country(country) => {
                self.sessions.set_last_country(user, &country);
                self.send_news(target, user, &country).await
            }
            Callback::Refresh => match self.sessions.last_country(user) {
                Some(country) => self.send_news(target, user, &country).await,
                None => {
                    let language = self.sessions.language(user);
                    self.chat
                        .edit_message_text(
                            target.chat_id,
                            target.message_id,
                            texts(language).no_country_selected,
                            None,
                        )
                        .await
                }
            },
            Callback::BackToCountries => {
                let language = self.sessions.language(user);
                self.show_country_menu(target, language).await
            }
            Callback::Exit => {
                let language = self.sessions.language(user);
                self.chat
                    .send_message(
                        target.chat_id,
                        texts(language).goodbye,
                        Some(&keyboards::start_again(language)),
                    )
                    .await
            }
        }
    }

    async fn show_language_menu(&self, chat_id: ChatId) -> Result<(), Box<dyn Error>> {
        self.chat
            .send_message(chat_id, LANGUAGE_PROMPT, Some(&keyboards::languages()))
            .await
    }

    async fn show_country_menu(&self, target: MessageRef, language: Language) -> Result<(), Box<dyn Error>> {
        let keyboard = keyboards::countries(language, self.aggregator.catalog().countries());
        self.chat
            .edit_message_text(
                target.chat_id,
                target.message_id,
                texts(language).select_country,
                Some(&keyboard),
            )
            .await
    }

    /// Aggregate, translate and deliver the news for `country`, then offer
    /// the Back / Refresh / Exit menu.
    ///
    /// A chunk the chat service rejects is logged and skipped; the menu is
    /// sent regardless.
    #[instrument(level = "info", skip(self, target))]
    async fn send_news(&self, target: MessageRef, user: UserId, country: &str) -> Result<(), Box<dyn Error>> {
        let language = self.sessions.language(user);
        let country_name = i18n::country_name(language, country).unwrap_or(country);
        self.chat
            .edit_message_text(
                target.chat_id,
                target.message_id,
                &i18n::loading(language, country_name),
                None,
            )
            .await?;

        let news = self.aggregator.aggregate(country).await;
        let translated = translate_text(&self.translator, &news, language).await;

        let chunks = chunk_message(&translated, self.chunk_chars);
        let total = chunks.len();
        info!(chars = translated.chars().count(), messages = total, "Delivering news");
        // The action menu goes out even when a chunk is rejected.
        for (index, chunk) in chunks.into_iter().enumerate() {
            if let Err(e) = self.chat.send_message(target.chat_id, chunk, None).await {
                warn!(chunk = index + 1, total, error = %e, "Failed to send news chunk; continuing");
            }
        }

        self.chat
            .send_message(
                target.chat_id,
                texts(language).choose_action,
                Some(&keyboards::actions(language)),
            )
            .await
    }
}

/// `/start`, `/start@SomeBot` and `/start payload` all yield `start`.
fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    Some(command.split('@').next().unwrap_or(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::telegram::InlineKeyboardMarkup;
    use crate::config::{FetchSettings, Notices};
    use crate::models::Source;
    use crate::scrapers::catalog::Catalog;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Message {
            chat: ChatId,
            text: String,
            buttons: Vec<String>,
        },
        Edit {
            chat: ChatId,
            message: i64,
            text: String,
            buttons: Vec<String>,
        },
        Answer(String),
    }

    fn button_data(keyboard: Option<&InlineKeyboardMarkup>) -> Vec<String> {
        keyboard
            .map(|k| {
                k.inline_keyboard
                    .iter()
                    .flatten()
                    .map(|b| b.callback_data.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[derive(Default)]
    struct RecordingChat {
        sent: Mutex<Vec<Sent>>,
        /// Plain messages containing this text are refused.
        reject: Option<&'static str>,
    }

    impl RecordingChat {
        fn take(&self) -> Vec<Sent> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }
    }

    impl ChatApi for RecordingChat {
        async fn send_message(
            &self,
            chat_id: ChatId,
            text: &str,
            keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<(), Box<dyn Error>> {
            if self.reject.is_some_and(|needle| text.contains(needle)) {
                return Err("Bad Request: message is too long".into());
            }
            self.sent.lock().unwrap().push(Sent::Message {
                chat: chat_id,
                text: text.to_string(),
                buttons: button_data(keyboard),
            });
            Ok(())
        }

        async fn edit_message_text(
            &self,
            chat_id: ChatId,
            message_id: i64,
            text: &str,
            keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<(), Box<dyn Error>> {
            self.sent.lock().unwrap().push(Sent::Edit {
                chat: chat_id,
                message: message_id,
                text: text.to_string(),
                buttons: button_data(keyboard),
            });
            Ok(())
        }

        async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), Box<dyn Error>> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Answer(callback_query_id.to_string()));
            Ok(())
        }
    }

    struct OnePageFetcher(String);

    impl PageFetcher for OnePageFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            if url == "https://daily.test/" {
                Ok(self.0.clone())
            } else {
                Err("offline".into())
            }
        }
    }

    struct EchoTranslator;

    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str, target: &str) -> Result<String, Box<dyn Error>> {
            Ok(format!("[{target}] {text}"))
        }
    }

    const CHAT: ChatId = 500;
    const USER: i64 = 42;

    fn bot_with_page(page: &str, chunk_chars: usize) -> NewsBot<RecordingChat, OnePageFetcher, EchoTranslator> {
        let catalog = Catalog::new(vec![
            (
                "Poland",
                vec![
                    Source::new("Daily", "https://daily.test/", "h2 a", "https://daily.test").unwrap(),
                    Source::new("Down", "https://down.test/", "h2 a", "https://down.test").unwrap(),
                ],
            ),
            ("China", vec![]),
        ]);
        let aggregator = Aggregator::new(
            OnePageFetcher(page.to_string()),
            catalog,
            Notices::default(),
            &FetchSettings::default(),
        );
        NewsBot::new(
            RecordingChat::default(),
            aggregator,
            EchoTranslator,
            SessionStore::new(),
            chunk_chars,
        )
    }

    fn bot() -> NewsBot<RecordingChat, OnePageFetcher, EchoTranslator> {
        bot_with_page(r#"<h2><a href="/story">Sejm votes</a></h2>"#, 4000)
    }

    fn start_update(language_code: &str) -> Update {
        serde_json::from_value(json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "chat": { "id": CHAT },
                "from": { "id": USER, "language_code": language_code },
                "text": "/start"
            }
        }))
        .unwrap()
    }

    fn callback_update(data: &str) -> Update {
        serde_json::from_value(json!({
            "update_id": 2,
            "callback_query": {
                "id": "cb",
                "from": { "id": USER, "language_code": "ru" },
                "message": { "message_id": 77, "chat": { "id": CHAT } },
                "data": data
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("/start"), Some("start"));
        assert_eq!(command_name("/start@NewsBot"), Some("start"));
        assert_eq!(command_name("/start deep-link"), Some("start"));
        assert_eq!(command_name("start"), None);
        assert_eq!(command_name(""), None);
    }

    #[tokio::test]
    async fn test_start_detects_language_and_shows_menu() {
        let bot = bot();
        bot.handle_update(start_update("uk")).await.unwrap();

        assert_eq!(bot.sessions().language(USER), Language::Ua);
        assert_eq!(
            bot.chat.take(),
            vec![Sent::Message {
                chat: CHAT,
                text: LANGUAGE_PROMPT.to_string(),
                buttons: vec!["lang_EN".into(), "lang_UA".into(), "lang_RU".into()],
            }]
        );
    }

    #[tokio::test]
    async fn test_language_choice_shows_country_menu() {
        let bot = bot();
        bot.handle_update(callback_update("lang_RU")).await.unwrap();

        assert_eq!(bot.sessions().language(USER), Language::Ru);
        assert_eq!(
            bot.chat.take(),
            vec![
                Sent::Answer("cb".to_string()),
                Sent::Edit {
                    chat: CHAT,
                    message: 77,
                    text: "Выберите страну:".to_string(),
                    buttons: vec!["country_Poland".into(), "country_China".into(), "exit".into()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_country_choice_sends_translated_news() {
        let bot = bot();
        bot.sessions().set_language(USER, Language::Ua);
        bot.handle_update(callback_update("country_Poland")).await.unwrap();

        assert_eq!(bot.sessions().last_country(USER).as_deref(), Some("Poland"));
        let sent = bot.chat.take();
        assert_eq!(sent.len(), 4);
        assert_eq!(
            sent[1],
            Sent::Edit {
                chat: CHAT,
                message: 77,
                text: "Отримання новин з Польща...".to_string(),
                buttons: vec![],
            }
        );
        assert_eq!(
            sent[2],
            Sent::Message {
                chat: CHAT,
                text: "[uk] 📰 Daily:\nSejm votes\nhttps://daily.test/story".to_string(),
                buttons: vec![],
            }
        );
        assert_eq!(
            sent[3],
            Sent::Message {
                chat: CHAT,
                text: "Оберіть дію:".to_string(),
                buttons: vec!["back_to_countries".into(), "refresh_news".into(), "exit".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_long_news_is_chunked() {
        let page: String = (0..5)
            .map(|i| format!(r#"<h2><a href="/{i}">{}</a></h2>"#, "x".repeat(30)))
            .collect();
        // identical titles with distinct links are all kept
        let bot = bot_with_page(&page, 50);
        bot.handle_update(callback_update("country_Poland")).await.unwrap();

        let texts: Vec<String> = bot
            .chat
            .take()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message { text, buttons, .. } if buttons.is_empty() => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.len() > 1);
        assert!(texts.iter().all(|t| t.chars().count() <= 50));
        assert!(texts.concat().starts_with("[en] 📰 Daily:"));
    }

    #[tokio::test]
    async fn test_rejected_chunk_still_delivers_rest_and_menu() {
        let page = format!(
            r#"<h2><a href="/a">{}</a></h2><h2><a href="/b">Sejm votes</a></h2>"#,
            "y".repeat(30)
        );
        let mut bot = bot_with_page(&page, 40);
        bot.chat.reject = Some("Sejm");
        bot.handle_update(callback_update("country_Poland")).await.unwrap();

        let sent = bot.chat.take();
        let news: Vec<&String> = sent
            .iter()
            .filter_map(|s| match s {
                Sent::Message { text, buttons, .. } if buttons.is_empty() => Some(text),
                _ => None,
            })
            .collect();
        assert!(!news.is_empty());
        assert!(news.iter().all(|t| !t.contains("Sejm")));
        assert_eq!(
            sent.last(),
            Some(&Sent::Message {
                chat: CHAT,
                text: "Choose an action:".to_string(),
                buttons: vec!["back_to_countries".into(), "refresh_news".into(), "exit".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_country_without_news_sends_notice() {
        let bot = bot();
        bot.handle_update(callback_update("country_China")).await.unwrap();

        let sent = bot.chat.take();
        assert_eq!(
            sent[2],
            Sent::Message {
                chat: CHAT,
                text: format!("[en] {}", Notices::default().no_news),
                buttons: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_without_country_warns() {
        let bot = bot();
        bot.handle_update(callback_update("refresh_news")).await.unwrap();

        assert_eq!(
            bot.chat.take()[1],
            Sent::Edit {
                chat: CHAT,
                message: 77,
                text: "⚠️ No country selected yet.".to_string(),
                buttons: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_repeats_last_country() {
        let bot = bot();
        bot.sessions().set_last_country(USER, "Poland");
        bot.handle_update(callback_update("refresh_news")).await.unwrap();

        let sent = bot.chat.take();
        assert!(matches!(&sent[1], Sent::Edit { text, .. } if text == "Fetching news from Poland..."));
        assert_eq!(sent.len(), 4);
    }

    #[tokio::test]
    async fn test_back_and_exit() {
        let bot = bot();
        bot.sessions().set_language(USER, Language::Ru);

        bot.handle_update(callback_update("back_to_countries")).await.unwrap();
        assert!(matches!(&bot.chat.take()[1], Sent::Edit { text, .. } if text == "Выберите страну:"));

        bot.handle_update(callback_update("exit")).await.unwrap();
        assert_eq!(
            bot.chat.take()[1],
            Sent::Message {
                chat: CHAT,
                text: "До свидания! 👋".to_string(),
                buttons: vec!["start_again".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_start_again_redetects_language() {
        let bot = bot();
        bot.sessions().set_language(USER, Language::En);
        bot.handle_update(callback_update("start_again")).await.unwrap();

        assert_eq!(bot.sessions().language(USER), Language::Ru);
        assert!(matches!(&bot.chat.take()[1], Sent::Message { text, .. } if text == LANGUAGE_PROMPT));
    }

    #[tokio::test]
    async fn test_unknown_callback_is_only_acknowledged() {
        let bot = bot();
        bot.handle_update(callback_update("mystery")).await.unwrap();
        assert_eq!(bot.chat.take(), vec![Sent::Answer("cb".to_string())]);
    }

    #[tokio::test]
    async fn test_plain_text_is_ignored() {
        let bot = bot();
        let update: Update = serde_json::from_value(json!({
            "update_id": 3,
            "message": { "message_id": 1, "chat": { "id": CHAT }, "text": "hello" }
        }))
        .unwrap();
        bot.handle_update(update).await.unwrap();
        assert!(bot.chat.take().is_empty());
    }
}
