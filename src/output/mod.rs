//! Output module for run reports
//!
//! This module handles:
//! - Recording what happened to each site during a run
//! - Printing a summary once the run is over

mod report;
pub mod stats;

pub use report::{RunReport, SiteOutcome, SiteReport};
pub use stats::{describe_outcome, print_run_summary};
