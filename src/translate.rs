//! Translation of report text into the reader's language.
//!
//! # Architecture
//!
//! - [`Translator`]: async trait for a translation backend
//! - [`GoogleTranslator`]: client for the public Google translate endpoint
//! - [`translate_text`]: splits a report into request-sized pieces, translates
//!   them in order and falls back to the untranslated text on any failure
//!
//! There are no retries. A failed translation means the reader gets the
//! headlines in their original language.

use crate::config::TranslationSettings;
use crate::models::Language;
use crate::utils::{pack_lines, truncate_for_log};
use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// A translation backend.
pub trait Translator {
    /// Translate `text` into the language identified by `target`
    /// (an ISO 639-1 code such as `uk`).
    async fn translate(&self, text: &str, target: &str) -> Result<String, Box<dyn Error>>;

    /// Longest text accepted by a single [`Translator::translate`] call.
    fn max_request_chars(&self) -> usize {
        4000
    }
}

/// Client for `translate.googleapis.com/translate_a/single` (`client=gtx`).
///
/// The source language is detected by the service.
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
    max_request_chars: usize,
}

impl GoogleTranslator {
    pub fn new(settings: &TranslationSettings) -> Result<Self, Box<dyn Error>> {
        let endpoint = Url::parse(&settings.endpoint)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            max_request_chars: settings.max_request_chars,
        })
    }

    fn request_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", "auto")
            .append_pair("tl", target)
            .append_pair("dt", "t");
        url
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &self.endpoint.as_str())
            .field("max_request_chars", &self.max_request_chars)
            .finish()
    }
}

impl Translator for GoogleTranslator {
    #[instrument(level = "debug", skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(&self, text: &str, target: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = self
            .client
            .post(self.request_url(target))
            .form(&[("q", text)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let translated = parse_gtx_response(&body)?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Translated text");
        Ok(translated)
    }

    fn max_request_chars(&self) -> usize {
        self.max_request_chars
    }
}

/// Pull the translated text out of a `client=gtx` response.
///
/// The body is a nested array whose first element lists translated segments;
/// the first entry of each segment is the translated text.
fn parse_gtx_response(body: &str) -> Result<String, Box<dyn Error>> {
    let value: Value = serde_json::from_str(body)?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("unexpected translation response: {}", truncate_for_log(body, 200)))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

/// Translate `text` into `language`, returning `text` unchanged on failure.
///
/// Long text is split with [`pack_lines`] and sent piece by piece. Newlines at
/// the edges of a piece are kept out of the request and put back afterwards,
/// so blank lines between report sections survive translation.
///
/// # Arguments
///
/// * `translator` - The translation backend
/// * `text` - The report or notice to translate
/// * `language` - The reader's language
///
/// # Returns
///
/// The translated text, or `text` itself if any piece fails. Whitespace-only
/// text is returned without calling the backend.
#[instrument(level = "info", skip(translator, text), fields(chars = text.chars().count()))]
pub async fn translate_text<T: Translator>(translator: &T, text: &str, language: Language) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let target = language.translation_target();
    let mut translated = String::with_capacity(text.len());
    for piece in pack_lines(text, translator.max_request_chars()) {
        let body = piece.text.trim_matches('\n');
        if body.is_empty() {
            translated.push_str(&piece.text);
        } else {
            let lead = piece.text.len() - piece.text.trim_start_matches('\n').len();
            let trail = piece.text.trim_end_matches('\n').len();
            match translator.translate(body, target).await {
                Ok(out) => {
                    translated.push_str(&piece.text[..lead]);
                    translated.push_str(&out);
                    translated.push_str(&piece.text[trail..]);
                }
                Err(e) => {
                    warn!(%target, error = %e, "Translation failed; sending original text");
                    return text.to_string();
                }
            }
        }
        translated.push_str(piece.separator);
    }
    translated
}
