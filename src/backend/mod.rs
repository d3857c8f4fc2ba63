//! Recipe-management backends
//!
//! Each supported service is a stateless HTTP adapter implementing
//! [`RecipeBackend`]. The coordinator only ever talks to the trait, so the
//! pagination and status-code quirks of each service stay inside its own
//! module:
//!
//! | Service | Listing | Record URL fields | Import success |
//! |---------|---------|-------------------|----------------|
//! | Mealie  | `page`/`perPage`, `items`, ends on empty page | `orgURL`, `originalURL` | 201 |
//! | Tandoor | `page`/`limit`, `results`, ends when `next` is absent | `source` | 200 or 201 |

mod mealie;
mod tandoor;

pub use mealie::MealieClient;
pub use tandoor::TandoorClient;

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Timeout for lightweight calls (connection test, single import)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for bulk listing pages
pub const INDEX_PAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// The capability set every recipe backend must provide
///
/// None of these operations fail: network and decoding problems degrade to
/// `ConnectionStatus` variants, partial URL sets, or `false`.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// Human-readable service name used in logs and reports
    fn name(&self) -> &'static str;

    /// Issues a minimal authenticated read and classifies the outcome
    async fn test_connection(&self) -> ConnectionStatus;

    /// Collects every source URL the service already knows about
    ///
    /// A failing page ends pagination and returns what was gathered so far.
    async fn existing_urls(&self) -> HashSet<String>;

    /// Asks the service to import the recipe at `url`
    ///
    /// Returns true only on the service's success status for this endpoint.
    async fn import_recipe(&self, url: &str) -> bool;
}

/// Outcome of a backend connectivity test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The authenticated read succeeded
    Connected,

    /// The service answered 401; carries the credential's name for the hint
    Unauthorized { credential: &'static str },

    /// Any other non-success status code
    HttpStatus(u16),

    /// The request timed out
    Timeout,

    /// The TCP connection could not be established
    Refused,

    /// Anything else (TLS, decoding, invalid URL, ...)
    Other(String),
}

impl ConnectionStatus {
    /// Returns true only for [`ConnectionStatus::Connected`]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Classifies the result of a connectivity request
    pub(crate) fn classify(
        result: Result<Response, reqwest::Error>,
        credential: &'static str,
    ) -> Self {
        match result {
            Ok(response) => match response.status() {
                StatusCode::OK => Self::Connected,
                StatusCode::UNAUTHORIZED => Self::Unauthorized { credential },
                status => Self::HttpStatus(status.as_u16()),
            },
            Err(e) if e.is_timeout() => Self::Timeout,
            Err(e) if e.is_connect() => Self::Refused,
            Err(e) => Self::Other(e.to_string()),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connection successful"),
            Self::Unauthorized { credential } => {
                write!(f, "Authentication failed - check {}", credential)
            }
            Self::HttpStatus(code) => write!(f, "Connection failed with status code {}", code),
            Self::Timeout => write!(f, "Connection timeout - check URL"),
            Self::Refused => write!(f, "Connection refused - check URL and port"),
            Self::Other(message) => write!(f, "Error: {}", message),
        }
    }
}

/// JSON body shared by both services' "create from URL" endpoints
#[derive(Debug, Serialize)]
pub(crate) struct ImportRequest<'a> {
    pub url: &'a str,
}

/// Builds the HTTP client used for backend API calls
///
/// Per-request timeouts are applied at each call site.
pub fn build_api_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("recipe-dredger/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Builds a client for every enabled backend, Mealie first
pub fn build_backends(config: &Config) -> Result<Vec<Box<dyn RecipeBackend>>, reqwest::Error> {
    let client = build_api_client()?;
    let mut backends: Vec<Box<dyn RecipeBackend>> = Vec::new();

    if config.mealie.enabled {
        backends.push(Box::new(MealieClient::new(
            client.clone(),
            &config.mealie.url,
            &config.mealie.credential,
        )));
    }

    if config.tandoor.enabled {
        backends.push(Box::new(TandoorClient::new(
            client,
            &config.tandoor.url,
            &config.tandoor.credential,
        )));
    }

    Ok(backends)
}

/// Strips trailing slashes so endpoint paths can be appended directly
pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ScraperConfig};

    fn config(mealie: bool, tandoor: bool) -> Config {
        Config {
            mealie: BackendConfig {
                enabled: mealie,
                url: "http://mealie.local:9000/".to_string(),
                credential: "m".to_string(),
            },
            tandoor: BackendConfig {
                enabled: tandoor,
                url: "http://tandoor.local:8080".to_string(),
                credential: "t".to_string(),
            },
            scraper: ScraperConfig::default(),
            active_site_list: "sites.txt".to_string(),
        }
    }

    #[test]
    fn test_build_backends_only_enabled() {
        let backends = build_backends(&config(true, false)).unwrap();
        assert_eq!(backends.len(), 1);
        assert_eq!(backends[0].name(), "Mealie");

        let backends = build_backends(&config(false, true)).unwrap();
        assert_eq!(backends.len(), 1);
        assert_eq!(backends[0].name(), "Tandoor");

        let backends = build_backends(&config(true, true)).unwrap();
        let names: Vec<_> = backends.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["Mealie", "Tandoor"]);

        assert!(build_backends(&config(false, false)).unwrap().is_empty());
    }

    #[test]
    fn test_connection_status_messages() {
        assert_eq!(
            ConnectionStatus::Connected.to_string(),
            "Connection successful"
        );
        assert_eq!(
            ConnectionStatus::Unauthorized {
                credential: "API token"
            }
            .to_string(),
            "Authentication failed - check API token"
        );
        assert_eq!(
            ConnectionStatus::HttpStatus(500).to_string(),
            "Connection failed with status code 500"
        );
        assert_eq!(
            ConnectionStatus::Timeout.to_string(),
            "Connection timeout - check URL"
        );
        assert_eq!(
            ConnectionStatus::Refused.to_string(),
            "Connection refused - check URL and port"
        );
    }

    #[test]
    fn test_only_connected_is_ok() {
        assert!(ConnectionStatus::Connected.is_ok());
        assert!(!ConnectionStatus::HttpStatus(200).is_ok());
        assert!(!ConnectionStatus::Refused.is_ok());
        assert!(!ConnectionStatus::Other("boom".to_string()).is_ok());
    }

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("http://x.test/"), "http://x.test");
        assert_eq!(trim_base_url("http://x.test//"), "http://x.test");
        assert_eq!(trim_base_url("http://x.test"), "http://x.test");
    }
}
