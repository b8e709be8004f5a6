//! News source scraping.
//!
//! Scraping is split into three steps, each in its own submodule:
//!
//! 1. **Catalog** ([`catalog`]): which sites belong to which country, with the
//!    CSS rule that finds headline links on each front page
//! 2. **Fetching** ([`fetch`]): one HTTP GET per front page, bounded by a
//!    timeout and sent with a browser-like User-Agent
//! 3. **Extraction** ([`extract`]): turn the page into at most N unique
//!    `(title, link)` pairs, resolving relative links against the site root
//!
//! # Supported Countries
//!
//! | Country | Sources |
//! |---------|---------|
//! | Ukraine | UNIAN, Ukrainian Pravda, Korrespondent, Censor.NET, NV |
//! | USA | NY Times, Washington Post, CNN, Fox News, BBC US |
//! | UK | BBC News, The Guardian, The Times, Sky News, Daily Mail |
//! | Germany | Der Spiegel, Süddeutsche Zeitung, FAZ, Bild, Tagesschau |
//! | Poland | Onet, WP, Gazeta Wyborcza, TVN24, Polsat News |
//! | China | Xinhua, China Daily, People's Daily, CCTV, Global Times |

pub mod catalog;
pub mod extract;
pub mod fetch;
