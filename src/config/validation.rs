use crate::config::types::{BackendConfig, Config, ScraperConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_backend("mealie", &config.mealie)?;
    validate_backend("tandoor", &config.tandoor)?;
    validate_scraper_config(&config.scraper)?;

    if config.active_site_list.trim().is_empty() {
        return Err(ConfigError::Validation(
            "active_site_list cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a backend entry; disabled backends are not checked
fn validate_backend(name: &str, backend: &BackendConfig) -> ConfigResult<()> {
    if !backend.enabled {
        return Ok(());
    }

    if !is_http_url(&backend.url) {
        return Err(ConfigError::InvalidUrl(format!(
            "{} URL must start with http:// or https://, got '{}'",
            name, backend.url
        )));
    }

    Url::parse(&backend.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL: {}", name, e)))?;

    Ok(())
}

/// Validates scraper parameters
fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    if !(1..=1000).contains(&config.target_recipes_per_site) {
        return Err(ConfigError::Validation(format!(
            "target_recipes_per_site must be between 1 and 1000, got {}",
            config.target_recipes_per_site
        )));
    }

    if !(100..=5000).contains(&config.scan_depth) {
        return Err(ConfigError::Validation(format!(
            "scan_depth must be between 100 and 5000, got {}",
            config.scan_depth
        )));
    }

    if !config.delay_between_imports.is_finite() || config.delay_between_imports < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_between_imports must be a non-negative number of seconds, got {}",
            config.delay_between_imports
        )));
    }

    Ok(())
}

/// Returns true if the string uses an http:// or https:// prefix
pub(crate) fn is_http_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(enabled: bool, url: &str) -> BackendConfig {
        BackendConfig {
            enabled,
            url: url.to_string(),
            credential: "token".to_string(),
        }
    }

    fn valid_config() -> Config {
        Config {
            mealie: backend(true, "http://mealie.local:9000"),
            tandoor: backend(false, "not a url"),
            scraper: ScraperConfig::default(),
            active_site_list: "sites.txt".to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_disabled_backend_url_not_checked() {
        let config = valid_config();
        assert!(validate_backend("tandoor", &config.tandoor).is_ok());
    }

    #[test]
    fn test_enabled_backend_requires_http_scheme() {
        assert!(validate_backend("mealie", &backend(true, "ftp://mealie.local")).is_err());
        assert!(validate_backend("mealie", &backend(true, "mealie.local:9000")).is_err());
        assert!(validate_backend("mealie", &backend(true, "https://mealie.local")).is_ok());
    }

    #[test]
    fn test_target_bounds() {
        let mut config = valid_config();
        config.scraper.target_recipes_per_site = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.scraper.target_recipes_per_site = 1001;
        assert!(validate(&config).is_err());

        config.scraper.target_recipes_per_site = 1000;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_scan_depth_bounds() {
        let mut config = valid_config();
        config.scraper.scan_depth = 99;
        assert!(validate(&config).is_err());

        config.scraper.scan_depth = 5001;
        assert!(validate(&config).is_err());

        config.scraper.scan_depth = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut config = valid_config();
        config.scraper.delay_between_imports = -1.0;
        assert!(validate(&config).is_err());

        config.scraper.delay_between_imports = f64::NAN;
        assert!(validate(&config).is_err());

        config.scraper.delay_between_imports = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://example.com"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("ftp://example.com"));
    }
}
