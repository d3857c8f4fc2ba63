//! Mealie API client

use crate::backend::{
    trim_base_url, ConnectionStatus, ImportRequest, RecipeBackend, INDEX_PAGE_TIMEOUT,
    REQUEST_TIMEOUT,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;

/// Recipes requested per listing page
const PAGE_SIZE: u32 = 1000;

#[derive(Debug, Deserialize)]
struct RecipePage {
    #[serde(default)]
    items: Option<Vec<RecipeSummary>>,
}

#[derive(Debug, Deserialize)]
struct RecipeSummary {
    #[serde(rename = "orgURL", default)]
    org_url: Option<String>,

    #[serde(rename = "originalURL", default)]
    original_url: Option<String>,
}

/// Client for a Mealie instance
#[derive(Debug, Clone)]
pub struct MealieClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl MealieClient {
    /// Creates a client for the instance at `base_url` (e.g., "http://192.168.1.79:9000")
    pub fn new(client: Client, base_url: &str, api_token: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            api_token: api_token.to_string(),
        }
    }

    fn recipes_endpoint(&self) -> String {
        format!("{}/api/recipes", self.base_url)
    }

    async fn list_page(
        &self,
        page: u32,
        per_page: u32,
        timeout: std::time::Duration,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(self.recipes_endpoint())
            .query(&[("page", page), ("perPage", per_page)])
            .bearer_auth(&self.api_token)
            .timeout(timeout)
            .send()
            .await
    }
}

#[async_trait]
impl RecipeBackend for MealieClient {
    fn name(&self) -> &'static str {
        "Mealie"
    }

    async fn test_connection(&self) -> ConnectionStatus {
        let result = self.list_page(1, 1, REQUEST_TIMEOUT).await;
        ConnectionStatus::classify(result, "API token")
    }

    async fn existing_urls(&self) -> HashSet<String> {
        tracing::info!("[Mealie] Fetching existing recipes...");
        let mut existing = HashSet::new();

        // Single-item probe before the full-size pages
        match self.list_page(1, 1, REQUEST_TIMEOUT).await {
            Ok(response) if response.status() == StatusCode::OK => {}
            Ok(response) => {
                tracing::warn!(
                    "[Mealie] Connection failed with status {}",
                    response.status().as_u16()
                );
                return existing;
            }
            Err(e) => {
                tracing::warn!("[Mealie] Connection error: {}", e);
                return existing;
            }
        }

        let mut page = 1;
        loop {
            let response = match self.list_page(page, PAGE_SIZE, INDEX_PAGE_TIMEOUT).await {
                Ok(response) if response.status() == StatusCode::OK => response,
                Ok(response) => {
                    tracing::warn!(
                        "[Mealie] Recipe index page {} returned status {}",
                        page,
                        response.status().as_u16()
                    );
                    break;
                }
                Err(e) => {
                    tracing::warn!("[Mealie] Error reading index: {}", e);
                    break;
                }
            };

            let items = match response.json::<RecipePage>().await {
                Ok(body) => body.items.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!("[Mealie] Error reading index: {}", e);
                    break;
                }
            };

            if items.is_empty() {
                break;
            }

            for item in items {
                for url in [item.org_url, item.original_url].into_iter().flatten() {
                    if !url.is_empty() {
                        existing.insert(url);
                    }
                }
            }

            tracing::debug!("[Mealie] Scanned page {} (total: {})", page, existing.len());
            page += 1;
        }

        tracing::info!("[Mealie] Found {} existing recipe URLs", existing.len());
        existing
    }

    async fn import_recipe(&self, url: &str) -> bool {
        let result = self
            .client
            .post(format!("{}/create/url", self.recipes_endpoint()))
            .bearer_auth(&self.api_token)
            .json(&ImportRequest { url })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == StatusCode::CREATED,
            Err(e) => {
                tracing::warn!("[Mealie] Error importing {}: {}", url, e);
                false
            }
        }
    }
}
