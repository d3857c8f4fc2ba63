//! Configuration module for Recipe Dredger
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file and the plain-text site lists it points at.
//!
//! # Example
//!
//! ```no_run
//! use recipe_dredger::config::{load_config, load_site_list, site_list_path};
//! use std::path::Path;
//!
//! let path = Path::new("config.toml");
//! let config = load_config(path).unwrap();
//! let sites = load_site_list(&site_list_path(path, &config)).unwrap();
//! println!("{} sites, scan depth {}", sites.len(), config.scraper.scan_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BackendConfig, Config, ScraperConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_site_list, parse_site_list,
    site_list_path,
};
