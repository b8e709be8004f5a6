//! Data models shared by the scrapers, the aggregator and the bot.
//!
//! - [`Source`]: one news website and the rule used to find its headlines
//! - [`SelectionRule`]: a CSS selector, parsed once when the source is built
//! - [`Headline`]: a single `(title, link)` pair taken from a page
//! - [`Section`] / [`Report`]: the text handed back to the chat for a country
//! - [`Language`]: the languages the bot can talk and translate into

use scraper::Selector;
use std::error::Error;
use std::fmt;

/// Marker printed in front of every source name in a report.
pub const SECTION_MARKER: &str = "📰";

/// A CSS selection rule identifying headline link elements on a page.
///
/// The selector is parsed when the rule is created, so a malformed rule is
/// rejected while the catalog is being built rather than on first use.
#[derive(Debug, Clone)]
pub struct SelectionRule {
    css: &'static str,
    selector: Selector,
}

impl SelectionRule {
    pub fn parse(css: &'static str) -> Result<Self, Box<dyn Error>> {
        let selector =
            Selector::parse(css).map_err(|e| format!("invalid selector {css:?}: {e}"))?;
        Ok(Self { css, selector })
    }

    pub fn css(&self) -> &'static str {
        self.css
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// One configured news website.
///
/// Identity is the display `name`. `base_url` is prepended to relative links
/// and may be empty when the site only emits absolute ones.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: &'static str,
    pub url: &'static str,
    pub rule: SelectionRule,
    pub base_url: &'static str,
}

impl Source {
    pub fn new(
        name: &'static str,
        url: &'static str,
        css: &'static str,
        base_url: &'static str,
    ) -> Result<Self, Box<dyn Error>> {
        let rule = SelectionRule::parse(css).map_err(|e| format!("source {name}: {e}"))?;
        Ok(Self {
            name,
            url,
            rule,
            base_url,
        })
    }
}

/// A headline scraped from a source page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Headline {
    /// Trimmed text content of the link element.
    pub title: String,
    /// Absolute URL of the story.
    pub link: String,
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.link)
    }
}

/// One source's contribution to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub source: String,
    pub headlines: Vec<Headline>,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SECTION_MARKER} {}:", self.source)?;
        for headline in &self.headlines {
            write!(f, "\n{headline}")?;
        }
        Ok(())
    }
}

/// All non-empty sections gathered for one country, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

/// Languages offered in the bot menus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Ua,
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ua, Language::Ru];

    /// Short tag used in callback data (`lang_EN`).
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ua => "UA",
            Language::Ru => "RU",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Name of the language written in that language.
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ua => "Українська",
            Language::Ru => "Русский",
        }
    }

    /// ISO 639-1 code understood by the translation service.
    pub fn translation_target(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ua => "uk",
            Language::Ru => "ru",
        }
    }

    /// Map a Telegram `language_code` (an IETF tag like `uk` or `ru-RU`)
    /// to a menu language. Anything unrecognised falls back to English.
    pub fn detect(telegram_code: Option<&str>) -> Self {
        let code = telegram_code.unwrap_or("en");
        if code.starts_with("uk") {
            Language::Ua
        } else if code.starts_with("ru") {
            Language::Ru
        } else {
            Language::En
        }
    }
}
