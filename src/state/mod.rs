//! State module for tracking scrape runs
//!
//! # Components
//!
//! - `RunPhase`: lifecycle of the single active run (idle, running, stopping)
//! - `StatusCell`: live atomic status written by the run loop
//! - `RunStatus`: immutable snapshot handed to observers

mod run_phase;
mod run_status;

// Re-export main types
pub use run_phase::RunPhase;
pub use run_status::{RunStatus, StatusCell};
