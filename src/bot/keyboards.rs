//! Inline keyboards and the callback data their buttons carry.

use super::i18n::{self, texts};
use super::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::models::Language;

/// A pressed button, decoded from its callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// `lang_<CODE>`
    Language(Language),
    /// `country_<KEY>`
    Country(String),
    BackToCountries,
    Refresh,
    Exit,
    StartAgain,
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(code) = data.strip_prefix("lang_") {
            return Language::from_code(code).map(Callback::Language);
        }
        if let Some(country) = data.strip_prefix("country_") {
            return (!country.is_empty()).then(|| Callback::Country(country.to_string()));
        }
        match data {
            "back_to_countries" => Some(Callback::BackToCountries),
            "refresh_news" => Some(Callback::Refresh),
            "exit" => Some(Callback::Exit),
            "start_again" => Some(Callback::StartAgain),
            _ => None,
        }
    }

    pub fn data(&self) -> String {
        match self {
            Callback::Language(language) => format!("lang_{}", language.code()),
            Callback::Country(country) => format!("country_{country}"),
            Callback::BackToCountries => "back_to_countries".to_string(),
            Callback::Refresh => "refresh_news".to_string(),
            Callback::Exit => "exit".to_string(),
            Callback::StartAgain => "start_again".to_string(),
        }
    }
}

fn button(text: &str, callback: Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::new(text, callback.data())
}

pub fn languages() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::column(
        Language::ALL
            .into_iter()
            .map(|language| button(language.label(), Callback::Language(language))),
    )
}

/// One button per country in catalog order, then Exit.
pub fn countries<'a>(
    language: Language,
    countries: impl IntoIterator<Item = &'a str>,
) -> InlineKeyboardMarkup {
    let mut buttons: Vec<InlineKeyboardButton> = countries
        .into_iter()
        .map(|country| {
            let name = i18n::country_name(language, country).unwrap_or(country);
            button(name, Callback::Country(country.to_string()))
        })
        .collect();
    buttons.push(button(texts(language).exit, Callback::Exit));
    InlineKeyboardMarkup::column(buttons)
}

pub fn actions(language: Language) -> InlineKeyboardMarkup {
    let t = texts(language);
    InlineKeyboardMarkup::column([
        button(t.back, Callback::BackToCountries),
        button(t.refresh, Callback::Refresh),
        button(t.exit, Callback::Exit),
    ])
}

pub fn start_again(language: Language) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::column([button(texts(language).start_again, Callback::StartAgain)])
}
