//! Tandoor API client

use crate::backend::{trim_base_url, ConnectionStatus, ImportRequest, RecipeBackend, REQUEST_TIMEOUT};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;

/// Recipes requested per listing page
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct RecipePage {
    #[serde(default)]
    results: Option<Vec<RecipeSummary>>,

    #[serde(default)]
    next: Option<String>,
}

impl RecipePage {
    fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|next| !next.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct RecipeSummary {
    #[serde(default)]
    source: Option<String>,
}

/// Client for a Tandoor instance
#[derive(Debug, Clone)]
pub struct TandoorClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TandoorClient {
    /// Creates a client for the instance at `base_url` (e.g., "http://192.168.1.80:8080")
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            api_key: api_key.to_string(),
        }
    }

    async fn list_page(&self, page: u32, limit: u32) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(format!("{}/api/recipe/", self.base_url))
            .query(&[("page", page), ("limit", limit)])
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
    }
}

#[async_trait]
impl RecipeBackend for TandoorClient {
    fn name(&self) -> &'static str {
        "Tandoor"
    }

    async fn test_connection(&self) -> ConnectionStatus {
        let result = self.list_page(1, 1).await;
        ConnectionStatus::classify(result, "API key")
    }

    async fn existing_urls(&self) -> HashSet<String> {
        tracing::info!("[Tandoor] Fetching existing recipes...");
        let mut existing = HashSet::new();
        let mut page = 1;

        loop {
            let response = match self.list_page(page, PAGE_SIZE).await {
                Ok(response) if response.status() == StatusCode::OK => response,
                Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                    tracing::warn!("[Tandoor] Authentication failed");
                    break;
                }
                Ok(response) => {
                    tracing::warn!(
                        "[Tandoor] Request failed with status {}",
                        response.status().as_u16()
                    );
                    break;
                }
                Err(e) => {
                    tracing::warn!("[Tandoor] Error reading index: {}", e);
                    break;
                }
            };

            let body = match response.json::<RecipePage>().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("[Tandoor] Error reading index: {}", e);
                    break;
                }
            };

            let has_next = body.has_next();
            let results = body.results.unwrap_or_default();
            if results.is_empty() {
                break;
            }

            existing.extend(
                results
                    .into_iter()
                    .filter_map(|recipe| recipe.source)
                    .filter(|source| !source.is_empty()),
            );

            tracing::debug!("[Tandoor] Scanned page {} (total: {})", page, existing.len());

            if !has_next {
                break;
            }
            page += 1;
        }

        tracing::info!("[Tandoor] Found {} existing recipe URLs", existing.len());
        existing
    }

    async fn import_recipe(&self, url: &str) -> bool {
        let result = self
            .client
            .post(format!("{}/api/recipe/from-url/", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ImportRequest { url })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => matches!(response.status(), StatusCode::OK | StatusCode::CREATED),
            Err(e) => {
                tracing::warn!("[Tandoor] Error importing {}: {}", url, e);
                false
            }
        }
    }
}
