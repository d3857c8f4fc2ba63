//! Recipe page verification
//!
//! A candidate page counts as a recipe when any detector in an ordered chain
//! accepts it. The default chain checks, in order:
//!
//! 1. a schema.org `Recipe` type in the raw markup (JSON-LD, compact or spaced)
//! 2. an element whose class names a well-known recipe card plugin
//!
//! This is a heuristic: missing a recipe is acceptable, flagging a non-recipe
//! should be rare given how specific the markers are.

use crate::crawler::fetcher::{fetch_url, FetchResult, PAGE_TIMEOUT};
use reqwest::Client;
use scraper::{Html, Selector};

/// Structured-data markers declaring a Recipe
pub const RECIPE_TYPE_MARKERS: [&str; 2] = [r#""@type":"Recipe""#, r#""@type": "Recipe""#];

/// Class-name fragments used by common WordPress recipe plugins
pub const RECIPE_PLUGIN_CLASSES: [&str; 3] = ["wp-recipe-maker", "tasty-recipes", "mv-create-card"];

/// One recipe detection heuristic
pub trait RecipeDetector: Send + Sync {
    /// Short name used in debug logs
    fn name(&self) -> &'static str;

    /// Returns true if the page body looks like a recipe
    fn detect(&self, body: &str) -> bool;
}

/// Looks for a schema.org Recipe type in the raw response body
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDataDetector;

impl RecipeDetector for StructuredDataDetector {
    fn name(&self) -> &'static str {
        "structured-data"
    }

    fn detect(&self, body: &str) -> bool {
        RECIPE_TYPE_MARKERS.iter().any(|marker| body.contains(marker))
    }
}

/// Looks for recipe-card plugin markup in the parsed document
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginMarkerDetector;

impl RecipeDetector for PluginMarkerDetector {
    fn name(&self) -> &'static str {
        "plugin-marker"
    }

    fn detect(&self, body: &str) -> bool {
        let Ok(selector) = Selector::parse("[class]") else {
            return false;
        };

        let document = Html::parse_document(body);
        for element in document.select(&selector) {
            let Some(class) = element.value().attr("class") else {
                continue;
            };
            if RECIPE_PLUGIN_CLASSES.iter().any(|marker| class.contains(marker)) {
                return true;
            }
        }
        false
    }
}

/// Fetches candidate pages and runs them through the detector chain
pub struct RecipeVerifier {
    client: Client,
    detectors: Vec<Box<dyn RecipeDetector>>,
}

impl RecipeVerifier {
    /// Creates a verifier with the default detector chain
    pub fn new(client: Client) -> Self {
        Self::with_detectors(
            client,
            vec![
                Box::new(StructuredDataDetector),
                Box::new(PluginMarkerDetector),
            ],
        )
    }

    /// Creates a verifier with a custom, ordered detector chain
    pub fn with_detectors(client: Client, detectors: Vec<Box<dyn RecipeDetector>>) -> Self {
        Self { client, detectors }
    }

    /// Runs the detector chain over an already-fetched body
    pub fn classify(&self, body: &str) -> Option<&'static str> {
        self.detectors
            .iter()
            .find(|detector| detector.detect(body))
            .map(|detector| detector.name())
    }

    /// Fetches `url` and reports whether it holds a recipe
    ///
    /// Non-success responses and network errors are treated as "not a recipe".
    pub async fn is_recipe(&self, url: &str) -> bool {
        let body = match fetch_url(&self.client, url, PAGE_TIMEOUT).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::HttpError { status_code } => {
                tracing::debug!("      [Verify] {} returned HTTP {}", url, status_code);
                return false;
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("      [Verify] {} failed: {}", url, error);
                return false;
            }
        };

        match self.classify(&body) {
            Some(detector) => {
                tracing::debug!("      [Verify] {} matched {}", url, detector);
                true
            }
            None => false,
        }
    }
}
