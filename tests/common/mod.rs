//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use recipe_dredger::config::{BackendConfig, Config, ScraperConfig};
use recipe_dredger::{ConnectionStatus, RecipeBackend};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RECIPE_PAGE: &str = r#"<html><head>
<script type="application/ld+json">{"@context":"https://schema.org","@type":"Recipe","name":"Soup"}</script>
</head><body><h1>Soup</h1></body></html>"#;

pub const PLAIN_PAGE: &str = "<html><body><p>Just a blog post</p></body></html>";

/// Creates a test configuration; the backend entries are unused when
/// backends are injected directly
pub fn create_test_config(dry_run: bool, target: u32, delay: f64) -> Config {
    Config {
        mealie: BackendConfig {
            enabled: true,
            url: "http://127.0.0.1:1".to_string(),
            credential: "token".to_string(),
        },
        tandoor: BackendConfig {
            enabled: false,
            url: "http://127.0.0.1:1".to_string(),
            credential: "key".to_string(),
        },
        scraper: ScraperConfig {
            dry_run,
            target_recipes_per_site: target,
            scan_depth: 1000,
            delay_between_imports: delay,
        },
        active_site_list: "sites.txt".to_string(),
    }
}

/// In-memory backend that records every import it receives
pub struct FakeBackend {
    name: &'static str,
    existing: HashSet<String>,
    accept: bool,
    imports: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    /// Returns the backend and a handle to the URLs it was asked to import
    pub fn new(
        name: &'static str,
        existing: &[String],
        accept: bool,
    ) -> (Box<dyn RecipeBackend>, Arc<Mutex<Vec<String>>>) {
        let imports = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            name,
            existing: existing.iter().cloned().collect(),
            accept,
            imports: Arc::clone(&imports),
        };
        (Box::new(backend), imports)
    }
}

#[async_trait]
impl RecipeBackend for FakeBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn test_connection(&self) -> ConnectionStatus {
        ConnectionStatus::Connected
    }

    async fn existing_urls(&self) -> HashSet<String> {
        self.existing.clone()
    }

    async fn import_recipe(&self, url: &str) -> bool {
        self.imports.lock().unwrap().push(url.to_string());
        self.accept
    }
}

/// Serves a URL sitemap at /sitemap.xml listing `paths` on the server
pub async fn mount_sitemap(server: &MockServer, paths: &[&str]) {
    let base = server.uri();
    let locs: Vec<String> = paths.iter().map(|p| format!("{}{}", base, p)).collect();
    mount_sitemap_locs(server, &locs).await;
}

/// Serves a URL sitemap at /sitemap.xml listing absolute `locs`
pub async fn mount_sitemap_locs(server: &MockServer, locs: &[String]) {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )))
        .mount(server)
        .await;
}

/// Serves `body` at `page_path`, expecting exactly `hits` GETs
pub async fn mount_page(server: &MockServer, page_path: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}
