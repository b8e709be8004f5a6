//! Menu texts in the three supported languages.

use crate::models::Language;

/// Prompt shown with the language menu, in all languages at once.
pub const LANGUAGE_PROMPT: &str = "Please choose a language / Оберіть мову / Выберите язык:";

pub struct Texts {
    pub select_country: &'static str,
    pub choose_action: &'static str,
    pub back: &'static str,
    pub refresh: &'static str,
    pub exit: &'static str,
    pub goodbye: &'static str,
    pub start_again: &'static str,
    pub no_country_selected: &'static str,
}

const EN: Texts = Texts {
    select_country: "Select a country:",
    choose_action: "Choose an action:",
    back: "🔙 Back",
    refresh: "🔄 Refresh",
    exit: "❌ Exit",
    goodbye: "Goodbye! 👋",
    start_again: "🔄 Start Again",
    no_country_selected: "⚠️ No country selected yet.",
};

const UA: Texts = Texts {
    select_country: "Оберіть країну:",
    choose_action: "Оберіть дію:",
    back: "🔙 Назад",
    refresh: "🔄 Оновити",
    exit: "❌ Вийти",
    goodbye: "До побачення! 👋",
    start_again: "🔄 Почати знову",
    no_country_selected: "⚠️ Країну ще не обрано.",
};

const RU: Texts = Texts {
    select_country: "Выберите страну:",
    choose_action: "Выберите действие:",
    back: "🔙 Назад",
    refresh: "🔄 Обновить",
    exit: "❌ Выход",
    goodbye: "До свидания! 👋",
    start_again: "🔄 Начать сначала",
    no_country_selected: "⚠️ Страна ещё не выбрана.",
};

pub fn texts(language: Language) -> &'static Texts {
    match language {
        Language::En => &EN,
        Language::Ua => &UA,
        Language::Ru => &RU,
    }
}

/// "Fetching news from ..." shown while a report is being built.
pub fn loading(language: Language, country_name: &str) -> String {
    match language {
        Language::En => format!("Fetching news from {country_name}..."),
        Language::Ua => format!("Отримання новин з {country_name}..."),
        Language::Ru => format!("Получаю новости из {country_name}..."),
    }
}

/// Localized name of a catalog country key.
pub fn country_name(language: Language, country: &str) -> Option<&'static str> {
    let names = match country {
        "Ukraine" => ["Ukraine", "Україна", "Украина"],
        "USA" => ["USA", "США", "США"],
        "UK" => ["UK", "Велика Британія", "Великобритания"],
        "Germany" => ["Germany", "Німеччина", "Германия"],
        "Poland" => ["Poland", "Польща", "Польша"],
        "China" => ["China", "Китай", "Китай"],
        _ => return None,
    };
    let index = match language {
        Language::En => 0,
        Language::Ua => 1,
        Language::Ru => 2,
    };
    Some(names[index])
}
