use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Recipe Dredger
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "BackendConfig::default_mealie")]
    pub mealie: BackendConfig,

    #[serde(default = "BackendConfig::default_tandoor")]
    pub tandoor: BackendConfig,

    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Site list file, resolved relative to the config file's directory
    #[serde(rename = "active-site-list", default = "default_site_list")]
    pub active_site_list: String,
}

impl Config {
    /// Returns true if at least one recipe backend is enabled
    pub fn any_backend_enabled(&self) -> bool {
        self.mealie.enabled || self.tandoor.enabled
    }
}

/// Connection settings for one recipe-management service
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Whether recipes are imported into this service
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the service (e.g., "http://192.168.1.79:9000")
    pub url: String,

    /// Bearer credential; Mealie calls it an API token, Tandoor an API key
    #[serde(rename = "api-token", alias = "api-key", default)]
    pub credential: String,
}

impl BackendConfig {
    fn default_mealie() -> Self {
        Self {
            enabled: true,
            url: "http://YOUR_MEALIE_IP:9000".to_string(),
            credential: String::new(),
        }
    }

    fn default_tandoor() -> Self {
        Self {
            enabled: false,
            url: "http://YOUR_TANDOOR_IP:8080".to_string(),
            credential: String::new(),
        }
    }
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Verify recipes but never call a backend
    #[serde(rename = "dry-run", default)]
    pub dry_run: bool,

    /// Stop importing from a site once this many recipes were imported
    #[serde(
        rename = "target-recipes-per-site",
        default = "default_target_recipes_per_site"
    )]
    pub target_recipes_per_site: u32,

    /// Maximum number of candidate URLs collected from one site's sitemap
    #[serde(rename = "scan-depth", default = "default_scan_depth")]
    pub scan_depth: usize,

    /// Pause after each successful import (seconds)
    #[serde(
        rename = "delay-between-imports",
        default = "default_delay_between_imports"
    )]
    pub delay_between_imports: f64,
}

impl ScraperConfig {
    /// The inter-import pause as a Duration; invalid values collapse to zero
    pub fn import_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_between_imports).unwrap_or(Duration::ZERO)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            target_recipes_per_site: default_target_recipes_per_site(),
            scan_depth: default_scan_depth(),
            delay_between_imports: default_delay_between_imports(),
        }
    }
}

fn default_site_list() -> String {
    "sites.txt".to_string()
}

fn default_target_recipes_per_site() -> u32 {
    50
}

fn default_scan_depth() -> usize {
    1000
}

fn default_delay_between_imports() -> f64 {
    1.5
}
