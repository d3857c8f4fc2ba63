//! Scrape coordinator - main run orchestration logic
//!
//! This module contains the run loop that ties everything together:
//! - Loading each enabled backend's known recipe URLs once per run
//! - Walking the site list in order: sitemap discovery, sitemap parsing,
//!   recipe verification, import
//! - Fanning successful verifications out to every enabled backend
//! - Publishing live progress and honouring cooperative cancellation
//!
//! Everything runs sequentially on one task. Cancellation is checked at each
//! site boundary and each candidate boundary; an in-flight request is never
//! interrupted, but every request carries its own timeout.

use crate::backend::{build_backends, RecipeBackend};
use crate::config::{Config, ScraperConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::sitemap::{find_sitemap, SitemapParser};
use crate::crawler::verifier::RecipeVerifier;
use crate::output::{RunReport, SiteOutcome};
use crate::state::StatusCell;
use crate::DredgerError;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main scrape coordinator structure
///
/// Construct it when a run starts: its status is Running from creation.
pub struct Coordinator {
    scraper: ScraperConfig,
    sites: Arc<[String]>,
    client: Client,
    backends: Vec<Box<dyn RecipeBackend>>,
    parser: SitemapParser,
    verifier: RecipeVerifier,
    status: Arc<StatusCell>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator with clients for every backend enabled in `config`
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration snapshot; it is not re-read during the run
    /// * `sites` - Site roots to scrape, in order
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DredgerError)` - An HTTP client could not be built
    pub fn new(config: &Config, sites: Vec<String>) -> Result<Self, DredgerError> {
        let backends = build_backends(config)?;
        Self::with_backends(config, sites, backends)
    }

    /// Creates a coordinator that imports through the given backends
    pub fn with_backends(
        config: &Config,
        sites: Vec<String>,
        backends: Vec<Box<dyn RecipeBackend>>,
    ) -> Result<Self, DredgerError> {
        let client = build_http_client()?;
        let sites: Arc<[String]> = sites.into();

        Ok(Self {
            scraper: config.scraper.clone(),
            status: Arc::new(StatusCell::running(Arc::clone(&sites))),
            sites,
            parser: SitemapParser::new(client.clone(), config.scraper.scan_depth),
            verifier: RecipeVerifier::new(client.clone()),
            client,
            backends,
            cancel: CancellationToken::new(),
        })
    }

    /// Shared handle to the live run status
    pub fn status(&self) -> Arc<StatusCell> {
        Arc::clone(&self.status)
    }

    /// Token that stops the run at its next checkpoint when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the main scrape loop to completion or cancellation
    ///
    /// Always ends with the status back in Idle and progress at 100.
    pub async fn run(self) -> RunReport {
        let mut report = RunReport::new(self.scraper.dry_run);
        let sites = Arc::clone(&self.sites);

        tracing::info!("[Scraper] Starting: {} sites", sites.len());
        tracing::info!(
            "[Scraper] Target: {} recipes/site",
            self.scraper.target_recipes_per_site
        );
        tracing::info!("[Scraper] Scan depth: {}", self.scraper.scan_depth);
        if self.scraper.dry_run {
            tracing::info!("[Scraper] Dry run: nothing will be imported");
        }

        let mut known = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            known.push(backend.existing_urls().await);
        }
        let combined = combined_existing(&known);

        for (index, site) in sites.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!("[Scraper] Stopped by user");
                break;
            }

            self.status.enter_site(index);
            tracing::info!("[Site {}/{}] {}", index + 1, sites.len(), site);

            let outcome = self
                .process_site(site, &combined, &mut known, &mut report)
                .await;
            report.push_site(site, outcome);
            self.status.site_completed();
        }

        report.finish(self.cancel.is_cancelled());
        self.status.finish();

        tracing::info!(
            "[Scraper] Complete! Imported {} recipes",
            report.total_imported
        );
        report
    }

    /// Handles one site: find its sitemap, collect candidates, import recipes
    async fn process_site(
        &self,
        site: &str,
        combined: &HashSet<String>,
        known: &mut [HashSet<String>],
        report: &mut RunReport,
    ) -> SiteOutcome {
        let Some(sitemap) = find_sitemap(&self.client, site).await else {
            tracing::info!("   [Skip] No sitemap found");
            return SiteOutcome::NoSitemap;
        };

        let targets = self.parser.parse(&sitemap, combined).await;
        if targets.is_empty() {
            tracing::info!("   [Skip] No new recipes found in recent posts");
            return SiteOutcome::NoCandidates { sitemap };
        }

        let target = self.scraper.target_recipes_per_site;
        tracing::info!("   [Found] {} candidate URLs", targets.len());
        tracing::info!("   [Target] {} recipes", target);

        let mut imported: u32 = 0;
        for url in &targets {
            if self.cancel.is_cancelled() {
                break;
            }

            if imported >= target {
                tracing::info!("   [Done] Target reached");
                break;
            }

            if !self.verifier.is_recipe(url).await {
                tracing::debug!("      [Skip] Not a recipe: {}", url);
                continue;
            }

            if self.scraper.dry_run {
                tracing::info!("      [DRY RUN] Would import: {}", url);
                imported += 1;
                self.status.record_import();
                continue;
            }

            let services = self.import_everywhere(url, known).await;
            if services.is_empty() {
                tracing::debug!("      [Skip] No service imported {}", url);
                continue;
            }

            tracing::info!("      [OK] Imported to {}: {}", services.join(", "), url);
            for service in services {
                report.record_backend_import(service);
            }
            imported += 1;
            self.status.record_import();

            self.pause_between_imports().await;
        }

        SiteOutcome::Processed {
            sitemap,
            candidates: targets.len(),
            imported,
            target_reached: imported >= target,
        }
    }

    /// Imports `url` into every backend that doesn't already have it
    ///
    /// Returns the names of the backends that accepted the import. Each
    /// success is added to that backend's known set so the URL can't be sent
    /// to it again during this run.
    async fn import_everywhere(
        &self,
        url: &str,
        known: &mut [HashSet<String>],
    ) -> Vec<&'static str> {
        let mut services = Vec::new();

        for (backend, existing) in self.backends.iter().zip(known.iter_mut()) {
            if existing.contains(url) {
                tracing::debug!("      [Skip] {} already has {}", backend.name(), url);
                continue;
            }

            if backend.import_recipe(url).await {
                existing.insert(url.to_string());
                services.push(backend.name());
            }
        }

        services
    }

    /// Sleeps for the configured delay, waking early if the run is cancelled
    async fn pause_between_imports(&self) {
        let delay = self.scraper.import_delay();
        if delay.is_zero() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.cancel.cancelled() => {}
        }
    }
}

/// URLs every enabled backend already has, used to pre-filter sitemap candidates
///
/// With several backends this is the intersection: a URL missing from any one
/// of them must stay a candidate so that backend can still receive it. The
/// per-backend check at import time catches the rest.
pub fn combined_existing(known: &[HashSet<String>]) -> HashSet<String> {
    let mut sets = known.iter();
    let Some(first) = sets.next() else {
        return HashSet::new();
    };

    let mut combined = first.clone();
    for set in sets {
        combined.retain(|url| set.contains(url));
    }
    combined
}
