/// Live status of the active scrape run
///
/// The run loop writes a `StatusCell` through atomics; observers read
/// `RunStatus` snapshots without ever blocking the worker.
use crate::state::RunPhase;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// Marker for "no site started yet"
const NO_SITE: usize = usize::MAX;

/// Point-in-time copy of a run's progress
///
/// Serializes with the same field names the status endpoint has always used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    /// True while the run is working and no stop has been requested
    pub running: bool,

    /// Percentage of sites started, 0-100
    pub progress: u8,

    /// The site currently being processed (empty before the first site)
    pub current_site: String,

    /// Recipes imported (or counted, in dry-run mode) across all sites
    pub total_imported: u64,

    /// Sites finished, whether skipped or processed
    pub sites_completed: usize,

    /// Number of sites in the run
    pub sites_total: usize,

    /// Lifecycle phase of the run loop
    pub phase: RunPhase,
}

/// Live, shared status of one run
///
/// The run loop is the only writer. Readers take lock-free snapshots, so a
/// status poll never delays the worker and the worker never waits on readers.
#[derive(Debug)]
pub struct StatusCell {
    sites: Arc<[String]>,
    phase: AtomicU8,
    progress: AtomicU8,
    current_site: AtomicUsize,
    total_imported: AtomicU64,
    sites_completed: AtomicUsize,
}

impl StatusCell {
    /// Creates the status for a run that is starting now
    ///
    /// The run is Running with progress 0, zeroed counters, and
    /// `sites_total` fixed to the length of `sites`.
    pub fn running(sites: Arc<[String]>) -> Self {
        Self {
            sites,
            phase: AtomicU8::new(RunPhase::Running.as_u8()),
            progress: AtomicU8::new(0),
            current_site: AtomicUsize::new(NO_SITE),
            total_imported: AtomicU64::new(0),
            sites_completed: AtomicUsize::new(0),
        }
    }

    /// Takes a consistent-enough copy of every field
    pub fn snapshot(&self) -> RunStatus {
        let phase = self.phase();
        let current_site = self
            .sites
            .get(self.current_site.load(Ordering::Acquire))
            .cloned()
            .unwrap_or_default();

        RunStatus {
            running: phase == RunPhase::Running,
            progress: self.progress.load(Ordering::Acquire),
            current_site,
            total_imported: self.total_imported.load(Ordering::Acquire),
            sites_completed: self.sites_completed.load(Ordering::Acquire),
            sites_total: self.sites.len(),
            phase,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> RunPhase {
        RunPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Moves Running → Stopping; returns false from any other phase
    pub fn request_stop(&self) -> bool {
        self.transition(RunPhase::Running, RunPhase::Stopping)
    }

    /// Marks the start of site `index` and recomputes progress
    pub(crate) fn enter_site(&self, index: usize) {
        let total = self.sites.len().max(1);
        let progress = (index.min(total) * 100 / total) as u8;

        self.current_site.store(index, Ordering::Release);
        self.progress.store(progress, Ordering::Release);
    }

    pub(crate) fn site_completed(&self) {
        self.sites_completed.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_import(&self) {
        self.total_imported.fetch_add(1, Ordering::AcqRel);
    }

    /// Ends the run: progress 100 and back to Idle from Running or Stopping
    pub(crate) fn finish(&self) {
        self.progress.store(100, Ordering::Release);
        if !self.transition(RunPhase::Running, RunPhase::Idle) {
            self.transition(RunPhase::Stopping, RunPhase::Idle);
        }
    }

    fn transition(&self, from: RunPhase, to: RunPhase) -> bool {
        if !from.can_transition_to(to) {
            return false;
        }

        self.phase
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(sites: &[&str]) -> StatusCell {
        let sites: Vec<String> = sites.iter().map(|s| s.to_string()).collect();
        StatusCell::running(sites.into())
    }

    #[test]
    fn test_initial_snapshot() {
        let status = cell(&["https://a.test", "https://b.test"]).snapshot();

        assert!(status.running);
        assert_eq!(status.phase, RunPhase::Running);
        assert_eq!(status.progress, 0);
        assert_eq!(status.current_site, "");
        assert_eq!(status.total_imported, 0);
        assert_eq!(status.sites_completed, 0);
        assert_eq!(status.sites_total, 2);
    }

    #[test]
    fn test_progress_is_floor_of_sites_started() {
        let cell = cell(&["a", "b", "c"]);

        cell.enter_site(0);
        assert_eq!(cell.snapshot().progress, 0);
        assert_eq!(cell.snapshot().current_site, "a");

        cell.enter_site(1);
        assert_eq!(cell.snapshot().progress, 33);

        cell.enter_site(2);
        let status = cell.snapshot();
        assert_eq!(status.progress, 66);
        assert_eq!(status.current_site, "c");
    }

    #[test]
    fn test_counters() {
        let cell = cell(&["a"]);
        cell.record_import();
        cell.record_import();
        cell.site_completed();

        let status = cell.snapshot();
        assert_eq!(status.total_imported, 2);
        assert_eq!(status.sites_completed, 1);
    }

    #[test]
    fn test_stop_clears_running_immediately() {
        let cell = cell(&["a"]);

        assert!(cell.request_stop());
        let status = cell.snapshot();
        assert!(!status.running);
        assert_eq!(status.phase, RunPhase::Stopping);

        // A second stop is rejected
        assert!(!cell.request_stop());
    }

    #[test]
    fn test_finish_from_running_and_stopping() {
        let running = cell(&["a"]);
        running.finish();
        let status = running.snapshot();
        assert_eq!(status.phase, RunPhase::Idle);
        assert_eq!(status.progress, 100);
        assert!(!status.running);

        let stopping = cell(&["a"]);
        stopping.request_stop();
        stopping.finish();
        assert_eq!(stopping.phase(), RunPhase::Idle);
        assert!(!stopping.request_stop());
    }

    #[test]
    fn test_status_serializes_with_wire_names() {
        let json = serde_json::to_value(cell(&["a"]).snapshot()).unwrap();
        for key in [
            "running",
            "progress",
            "current_site",
            "total_imported",
            "sites_completed",
            "sites_total",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["phase"], "running");
    }

    #[test]
    fn test_default_status_is_idle_and_zeroed() {
        let status = RunStatus::default();
        assert!(!status.running);
        assert_eq!(status.phase, RunPhase::Idle);
        assert_eq!(status.sites_total, 0);
    }
}
