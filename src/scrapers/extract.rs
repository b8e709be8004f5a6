//! Headline extraction from a fetched page.
//!
//! Extraction never fails: the HTML parser recovers from malformed markup, so
//! a broken page simply yields fewer (or no) headlines.

use crate::models::{Headline, SelectionRule};
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};

/// Default number of headlines kept per source.
pub const DEFAULT_HEADLINE_LIMIT: usize = 5;

/// Extract up to `limit` unique headlines from `markup`.
///
/// Elements without an `href` are skipped. Links that already carry an
/// `http://` or `https://` scheme are kept verbatim, anything else is
/// appended to `base_url`. Duplicate `(title, link)` pairs are dropped and
/// document order is preserved.
///
/// # Arguments
///
/// * `markup` - The page HTML as fetched
/// * `rule` - The source's parsed CSS selector
/// * `limit` - Maximum number of headlines to keep
/// * `base_url` - Prefix for relative links
///
/// # Returns
///
/// At most `limit` headlines. Markup that matches nothing yields an empty
/// vector; parsing never fails.
#[instrument(level = "debug", skip(markup, rule), fields(selector = rule.css()))]
pub fn extract_headlines(
    markup: &str,
    rule: &SelectionRule,
    limit: usize,
    base_url: &str,
) -> Vec<Headline> {
    let document = Html::parse_document(markup);

    let headlines: Vec<Headline> = document
        .select(rule.selector())
        .filter_map(|element| to_headline(element, base_url))
        .unique()
        .take(limit)
        .collect();

    debug!(count = headlines.len(), "Extracted headlines");
    headlines
}

fn to_headline(element: ElementRef<'_>, base_url: &str) -> Option<Headline> {
    let href = element.value().attr("href").filter(|h| !h.is_empty())?;
    let title = element.text().collect::<String>().trim().to_string();

    Some(Headline {
        title,
        link: absolute_link(href, base_url),
    })
}

/// Resolve `href` against the source's base URL by plain concatenation.
pub fn absolute_link(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{base_url}{href}")
    }
}
