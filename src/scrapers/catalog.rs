//! The country catalog: which news sites are read for which country.
//!
//! Sources are listed in the order their sections appear in a report.

use crate::models::Source;
use std::error::Error;
use std::fmt;

/// Raised when a country key is not present in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCountry(pub String);

impl fmt::Display for UnknownCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "country not recognized: {}", self.0)
    }
}

impl Error for UnknownCountry {}

/// `(name, page url, css selector, base url)`
type SourceRow = (&'static str, &'static str, &'static str, &'static str);

const UKRAINE: &[SourceRow] = &[
    ("UNIAN", "https://www.unian.net/", ".news-feed__item__title a", "https://www.unian.net"),
    ("Ukrainian Pravda", "https://www.pravda.com.ua/", ".article__title a", ""),
    ("Korrespondent", "https://korrespondent.net/", ".article__title a", "https://korrespondent.net"),
    ("Censor.NET", "https://censor.net/", ".news_item a", "https://censor.net"),
    ("NV", "https://nv.ua/", "article a", "https://nv.ua"),
];

const USA: &[SourceRow] = &[
    ("NY Times", "https://www.nytimes.com/", "section.css-1ez5fsm a", "https://www.nytimes.com"),
    ("Washington Post", "https://www.washingtonpost.com/", "a.card-headline", "https://www.washingtonpost.com"),
    ("CNN", "https://edition.cnn.com/world", "h3.cd__headline a", "https://edition.cnn.com"),
    ("Fox News", "https://www.foxnews.com/", "main .title a", "https://www.foxnews.com"),
    ("BBC US", "https://www.bbc.com/news/world/us_and_canada", "a.gs-c-promo-heading", "https://www.bbc.com"),
];

const UK: &[SourceRow] = &[
    ("BBC News", "https://www.bbc.com/news", "a.gs-c-promo-heading", "https://www.bbc.com"),
    ("The Guardian", "https://www.theguardian.com/uk", "a.js-headline-text", "https://www.theguardian.com"),
    ("The Times", "https://www.thetimes.co.uk/", "h3 a", "https://www.thetimes.co.uk"),
    ("Sky News", "https://news.sky.com/uk", ".sdc-site-tile__headline a", "https://news.sky.com"),
    ("Daily Mail", "https://www.dailymail.co.uk/news/index.html", ".linkro-darkred a", "https://www.dailymail.co.uk"),
];

const GERMANY: &[SourceRow] = &[
    ("Der Spiegel", "https://www.spiegel.de/", "article a[data-unique-id]", "https://www.spiegel.de"),
    ("Süddeutsche Zeitung", "https://www.sueddeutsche.de/", "h3.entry-title a", "https://www.sueddeutsche.de"),
    ("FAZ", "https://www.faz.net/", "article a", "https://www.faz.net"),
    ("Bild", "https://www.bild.de/", "a.tile__link", "https://www.bild.de"),
    ("Tagesschau", "https://www.tagesschau.de/", "a.ts-teaser__link", "https://www.tagesschau.de"),
];

const POLAND: &[SourceRow] = &[
    ("Onet", "https://www.onet.pl/", "article a", "https://www.onet.pl"),
    ("WP", "https://www.wp.pl/", "a[data-track-name=title]", "https://www.wp.pl"),
    ("Gazeta Wyborcza", "https://wyborcza.pl/", "h2 a", "https://wyborcza.pl"),
    ("TVN24", "https://tvn24.pl/", ".teaser a", "https://tvn24.pl"),
    ("Polsat News", "https://www.polsatnews.pl/", ".news__title a", "https://www.polsatnews.pl"),
];

const CHINA: &[SourceRow] = &[
    ("Xinhua", "https://english.news.cn/", ".tit a", "https://english.news.cn"),
    ("China Daily", "https://www.chinadaily.com.cn/", "a[title]", "https://www.chinadaily.com.cn"),
    ("People's Daily", "https://en.people.cn/", "h3 a", "https://en.people.cn"),
    ("CCTV", "https://english.cctv.com/", "a[href^='/']", "https://english.cctv.com"),
    ("Global Times", "https://www.globaltimes.cn/", "h3 a", "https://www.globaltimes.cn"),
];

const BUILTIN: &[(&str, &[SourceRow])] = &[
    ("Ukraine", UKRAINE),
    ("USA", USA),
    ("UK", UK),
    ("Germany", GERMANY),
    ("Poland", POLAND),
    ("China", CHINA),
];

/// Ordered mapping from country key to that country's sources.
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Vec<(&'static str, Vec<Source>)>,
}

impl Catalog {
    /// Build a catalog from explicit country buckets.
    pub fn new(countries: Vec<(&'static str, Vec<Source>)>) -> Self {
        Self { countries }
    }

    /// The built-in catalog of six countries with five sources each.
    ///
    /// Every selector is parsed here, so a typo fails startup instead of
    /// silently producing empty sections later.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        let countries = BUILTIN
            .iter()
            .map(|&(country, rows)| -> Result<_, Box<dyn Error>> {
                let sources = rows
                    .iter()
                    .map(|&(name, url, css, base)| Source::new(name, url, css, base))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((country, sources))
            })
            .collect::<Result<Vec<_>, Box<dyn Error>>>()?;
        Ok(Self::new(countries))
    }

    /// Country keys in menu order.
    pub fn countries(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.countries.iter().map(|(country, _)| *country)
    }

    /// Look up the sources of `country`, in display order.
    ///
    /// # Errors
    ///
    /// [`UnknownCountry`] when the key is not in the catalog. A known country
    /// with no sources yields an empty slice instead.
    pub fn sources_for(&self, country: &str) -> Result<&[Source], UnknownCountry> {
        self.countries
            .iter()
            .find(|(key, _)| *key == country)
            .map(|(_, sources)| sources.as_slice())
            .ok_or_else(|| UnknownCountry(country.to_string()))
    }
}
