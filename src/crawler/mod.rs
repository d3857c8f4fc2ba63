//! Crawler module for sitemap discovery, recipe verification, and import
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with per-request timeouts
//! - Sitemap discovery and recursive sitemap parsing
//! - Recipe page verification
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod sitemap;
mod verifier;

pub use coordinator::{combined_existing, Coordinator};
pub use fetcher::{
    build_http_client, fetch_url, probe_url, FetchResult, PAGE_TIMEOUT, PROBE_TIMEOUT,
    SITEMAP_TIMEOUT,
};
pub use sitemap::{
    find_sitemap, is_ignored_url, parse_sitemap_document, SitemapDocument, SitemapParser,
    IGNORED_URL_MARKERS, SITEMAP_PATHS,
};
pub use verifier::{
    PluginMarkerDetector, RecipeDetector, RecipeVerifier, StructuredDataDetector,
    RECIPE_PLUGIN_CLASSES, RECIPE_TYPE_MARKERS,
};

use crate::config::Config;
use crate::output::RunReport;
use crate::DredgerError;

/// Runs a complete scrape in the current task
///
/// This is the simplest entry point: it builds a coordinator for `sites`
/// and drives it to completion. Use [`crate::Supervisor`] to run in the
/// background with stop and status support.
pub async fn scrape(config: &Config, sites: Vec<String>) -> Result<RunReport, DredgerError> {
    let coordinator = Coordinator::new(config, sites)?;
    Ok(coordinator.run().await)
}
