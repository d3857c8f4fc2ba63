//! Sitemap discovery and parsing
//!
//! Sites are located by probing a handful of conventional sitemap paths.
//! The first one that answers is then walked recursively: index sitemaps
//! are followed into their post sitemaps, and URL sitemaps contribute
//! candidate pages that pass the path denylist and aren't already known.

use crate::crawler::fetcher::{fetch_url, probe_url, FetchResult, SITEMAP_TIMEOUT};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

/// Conventional sitemap locations, probed in this order
pub const SITEMAP_PATHS: [&str; 4] = [
    "/post-sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap.xml",
    "/sitemap_posts.xml",
];

/// Candidate URLs containing any of these substrings are never recipes
pub const IGNORED_URL_MARKERS: [&str; 7] = [
    "/about",
    "/contact",
    "/shop",
    "/privacy",
    "login",
    "cart",
    "roundup",
];

/// Nested index sitemaps deeper than this are not followed
const MAX_NESTING: usize = 8;

/// Finds the sitemap for a site by probing the conventional locations
///
/// # Returns
///
/// * `Some(String)` - The first sitemap URL that answered a HEAD probe with success
/// * `None` - Every probe failed; the site should be skipped
pub async fn find_sitemap(client: &Client, base_url: &str) -> Option<String> {
    let base = base_url.trim_end_matches('/');

    for path in SITEMAP_PATHS {
        let candidate = format!("{}{}", base, path);
        if probe_url(client, &candidate).await {
            return Some(candidate);
        }
    }

    None
}

/// Returns true if the URL looks like a non-recipe page
pub fn is_ignored_url(url: &str) -> bool {
    IGNORED_URL_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Repeated entries need not be contiguous (quick-xml `overlapped-lists`)
#[derive(Debug, Default, Deserialize)]
struct RawSitemap {
    #[serde(default)]
    sitemap: Vec<RawEntry>,

    #[serde(default)]
    url: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    loc: Option<String>,
}

/// The locations listed in one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Nested sitemap locations (`<sitemap><loc>`), in document order
    pub sitemaps: Vec<String>,

    /// Page locations (`<url><loc>`), in document order
    pub urls: Vec<String>,
}

impl SitemapDocument {
    /// Returns true if this document nests other sitemaps
    pub fn is_index(&self) -> bool {
        !self.sitemaps.is_empty()
    }
}

/// Parses the XML of a sitemap or sitemap index
///
/// Entries without a `<loc>` are dropped; unknown elements are ignored.
pub fn parse_sitemap_document(xml: &str) -> Result<SitemapDocument, quick_xml::DeError> {
    let raw: RawSitemap = quick_xml::de::from_str(xml)?;

    fn locations(entries: Vec<RawEntry>) -> Vec<String> {
        entries
            .into_iter()
            .filter_map(|entry| entry.loc)
            .map(|loc| loc.trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect()
    }

    Ok(SitemapDocument {
        sitemaps: locations(raw.sitemap),
        urls: locations(raw.url),
    })
}

/// Recursive sitemap walker bounded by a candidate cap
#[derive(Debug, Clone)]
pub struct SitemapParser {
    client: Client,
    scan_depth: usize,
}

impl SitemapParser {
    /// Creates a parser that stops collecting at `scan_depth` candidates
    pub fn new(client: Client, scan_depth: usize) -> Self {
        Self { client, scan_depth }
    }

    /// Collects candidate recipe URLs reachable from `sitemap_url`
    ///
    /// URLs in `ignore` are skipped. The result is deduplicated in first-seen
    /// order. Network and parse failures are logged and yield whatever was
    /// collected before them; this never fails.
    pub async fn parse(&self, sitemap_url: &str, ignore: &HashSet<String>) -> Vec<String> {
        let mut visited = HashSet::new();
        self.walk(sitemap_url, ignore, &mut visited, 0).await
    }

    fn walk<'a>(
        &'a self,
        sitemap_url: &'a str,
        ignore: &'a HashSet<String>,
        visited: &'a mut HashSet<String>,
        nesting: usize,
    ) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + 'a>> {
        Box::pin(async move {
            if nesting > MAX_NESTING {
                tracing::warn!("   [Sitemap] Nesting too deep, not following {}", sitemap_url);
                return Vec::new();
            }
            if !visited.insert(sitemap_url.to_string()) {
                tracing::debug!("   [Sitemap] Already parsed {}", sitemap_url);
                return Vec::new();
            }

            tracing::info!("   [Sitemap] Parsing: {}", sitemap_url);

            let body = match fetch_url(&self.client, sitemap_url, SITEMAP_TIMEOUT).await {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("   [Error] Parsing sitemap {}: HTTP {}", sitemap_url, status_code);
                    return Vec::new();
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("   [Error] Parsing sitemap {}: {}", sitemap_url, error);
                    return Vec::new();
                }
            };

            let document = match parse_sitemap_document(&body) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("   [Error] Parsing sitemap {}: {}", sitemap_url, e);
                    return Vec::new();
                }
            };

            let mut candidates = Vec::new();

            if document.is_index() {
                for nested in document.sitemaps.iter().filter(|loc| loc.contains("post")) {
                    if candidates.len() >= self.scan_depth {
                        break;
                    }
                    let found = self.walk(nested, ignore, visited, nesting + 1).await;
                    candidates.extend(found);
                }

                // No post sitemap produced anything: fall back to the first nested one
                if candidates.is_empty() {
                    let first = &document.sitemaps[0];
                    return self.walk(first, ignore, visited, nesting + 1).await;
                }
            }

            for loc in document.urls {
                if candidates.len() >= self.scan_depth {
                    break;
                }
                if is_ignored_url(&loc) || ignore.contains(&loc) {
                    continue;
                }
                candidates.push(loc);
            }

            dedup_in_order(candidates)
        })
    }
}

/// Removes duplicates while keeping the first occurrence of each URL
fn dedup_in_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
