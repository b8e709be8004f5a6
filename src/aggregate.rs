//! Per-country news aggregation.
//!
//! For one country the [`Aggregator`] fetches every catalog source, extracts
//! its headlines and renders the non-empty sections into a single report.
//! A source that fails to load is logged and left out; it never aborts the
//! rest of the request.

use crate::config::{FetchSettings, Notices};
use crate::models::{Report, Section, Source};
use crate::scrapers::catalog::Catalog;
use crate::scrapers::extract::extract_headlines;
use crate::scrapers::fetch::PageFetcher;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

pub struct Aggregator<F> {
    fetcher: F,
    catalog: Catalog,
    notices: Notices,
    headline_limit: usize,
    concurrency: usize,
}

impl<F: PageFetcher> Aggregator<F> {
    pub fn new(fetcher: F, catalog: Catalog, notices: Notices, settings: &FetchSettings) -> Self {
        Self {
            fetcher,
            catalog,
            notices,
            headline_limit: settings.headline_limit,
            concurrency: settings.concurrency.max(1),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build the text report for `country`.
    ///
    /// Returns the configured "unknown country" notice, without fetching
    /// anything, when the country is not in the catalog, and the "no news"
    /// notice when no source produced a headline.
    ///
    /// # Arguments
    ///
    /// * `country` - Catalog key such as `"Ukraine"`; matching is exact
    ///
    /// # Returns
    ///
    /// The report text, sections separated by a blank line. Failing sources
    /// are logged and left out, so this never returns an error.
    #[instrument(level = "info", skip(self))]
    pub async fn aggregate(&self, country: &str) -> String {
        let report = match self.collect(country).await {
            Some(report) => report,
            None => return self.notices.unknown_country.clone(),
        };

        if report.is_empty() {
            warn!(%country, "No source returned headlines");
            return self.notices.no_news.clone();
        }
        report.to_string()
    }

    /// Gather the sections for `country`, or `None` if it is not in the catalog.
    ///
    /// Up to `concurrency` pages are in flight at once; sections come back in
    /// catalog order either way.
    pub async fn collect(&self, country: &str) -> Option<Report> {
        let sources = match self.catalog.sources_for(country) {
            Ok(sources) => sources,
            Err(e) => {
                warn!(error = %e, "Refusing news request");
                return None;
            }
        };

        let t0 = Instant::now();
        let sections: Vec<Section> = stream::iter(sources)
            .map(|source| self.collect_section(source))
            .buffered(self.concurrency)
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(
            %country,
            sources = sources.len(),
            sections = sections.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Collected news"
        );
        Some(Report { sections })
    }

    /// Fetch and extract one source. Failures are logged and yield `None`.
    #[instrument(level = "debug", skip_all, fields(source = source.name))]
    async fn collect_section(&self, source: &Source) -> Option<Section> {
        let markup = match self.fetcher.fetch(source.url).await {
            Ok(markup) => markup,
            Err(e) => {
                error!(source = source.name, url = source.url, error = %e, "Failed to fetch news source");
                return None;
            }
        };

        let headlines = extract_headlines(&markup, &source.rule, self.headline_limit, source.base_url);
        if headlines.is_empty() {
            warn!(
                source = source.name,
                selector = source.rule.css(),
                "No headlines matched; skipping source"
            );
            return None;
        }

        debug!(source = source.name, count = headlines.len(), "Extracted source headlines");
        Some(Section {
            source: source.name.to_string(),
            headlines,
        })
    }
}
