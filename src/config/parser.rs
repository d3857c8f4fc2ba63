use crate::config::types::Config;
use crate::config::validation::{is_http_url, validate};
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use recipe_dredger::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Target per site: {}", config.scraper.target_recipes_per_site);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be matched to the configuration that drove it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the configured site list file against the config file's directory
pub fn site_list_path(config_path: &Path, config: &Config) -> PathBuf {
    let site_list = Path::new(&config.active_site_list);
    if site_list.is_absolute() {
        return site_list.to_path_buf();
    }

    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(site_list)
}

/// Reads a site list file and returns the valid site URLs in file order
pub fn load_site_list(path: &Path) -> ConfigResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_site_list(&content, &path.display().to_string()))
}

/// Parses site list text
///
/// Empty lines and lines starting with `#` are skipped. Lines that are not
/// http(s) URLs are skipped with a warning naming the offending line.
pub fn parse_site_list(content: &str, source: &str) -> Vec<String> {
    let mut sites = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if is_http_url(line) {
            sites.push(line.to_string());
        } else {
            tracing::warn!(
                "Invalid URL on line {} in {}: {}",
                index + 1,
                source,
                line
            );
        }
    }

    sites
}
