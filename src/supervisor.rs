//! Single-run control layer
//!
//! The [`Supervisor`] owns at most one active run. It validates start
//! requests, spawns the coordinator onto the Tokio runtime, and hands out
//! status snapshots to any number of concurrent observers.

use crate::backend::{build_backends, ConnectionStatus};
use crate::config::Config;
use crate::crawler::Coordinator;
use crate::output::RunReport;
use crate::state::{RunPhase, RunStatus, StatusCell};
use crate::DredgerError;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handles to the most recently started run
struct ActiveRun {
    status: Arc<StatusCell>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<RunReport>>,
}

impl ActiveRun {
    /// Moves a run whose task died before finishing back to Idle
    fn settle(&self) {
        let ended = self.handle.as_ref().is_some_and(JoinHandle::is_finished);
        if ended && self.status.phase() != RunPhase::Idle {
            tracing::warn!("[Scraper] Run task ended abnormally");
            self.status.finish();
        }
    }
}

/// Owner of the scrape run lifecycle
#[derive(Default)]
pub struct Supervisor {
    current: Mutex<Option<ActiveRun>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run over `sites` in the background
    ///
    /// Must be called from within a Tokio runtime. The returned status is
    /// already Running when this returns.
    ///
    /// # Errors
    ///
    /// * `AlreadyRunning` - a previous run has not reached Idle yet
    /// * `NoBackendEnabled` - both Mealie and Tandoor are disabled
    /// * `NoSites` - the site list is empty
    pub fn start(&self, config: &Config, sites: Vec<String>) -> Result<(), DredgerError> {
        if self.is_active() {
            return Err(DredgerError::AlreadyRunning);
        }
        if !config.any_backend_enabled() {
            return Err(DredgerError::NoBackendEnabled);
        }
        if sites.is_empty() {
            return Err(DredgerError::NoSites);
        }

        self.launch(Coordinator::new(config, sites)?)
    }

    /// Starts a prepared coordinator in the background
    ///
    /// Only the single-run rule is enforced here; the caller chose the
    /// coordinator's sites and backends.
    pub fn launch(&self, coordinator: Coordinator) -> Result<(), DredgerError> {
        let mut current = self.lock();
        if is_active(current.as_ref()) {
            return Err(DredgerError::AlreadyRunning);
        }

        let status = coordinator.status();
        let cancel = coordinator.cancellation_token();
        let handle = tokio::spawn(coordinator.run());

        *current = Some(ActiveRun {
            status,
            cancel,
            handle: Some(handle),
        });
        Ok(())
    }

    /// Requests a cooperative stop of the active run
    ///
    /// `running` reads false immediately; the worker exits at its next
    /// site or candidate checkpoint.
    pub fn stop(&self) -> Result<(), DredgerError> {
        let current = self.lock();
        let Some(run) = current.as_ref() else {
            return Err(DredgerError::NotRunning);
        };

        if !run.status.request_stop() {
            return Err(DredgerError::NotRunning);
        }

        run.cancel.cancel();
        tracing::info!("[Scraper] Stop requested");
        Ok(())
    }

    /// Snapshot of the current or most recent run
    ///
    /// Before any run has started this is the zeroed idle status.
    pub fn status(&self) -> RunStatus {
        self.lock()
            .as_ref()
            .map(|run| run.status.snapshot())
            .unwrap_or_default()
    }

    /// Returns true while a run is Running or Stopping
    pub fn is_active(&self) -> bool {
        is_active(self.lock().as_ref())
    }

    /// Waits for the most recent run to finish and returns its report
    ///
    /// Returns `None` if no run was started or its report was already taken.
    pub async fn wait(&self) -> Option<RunReport> {
        let (status, handle) = {
            let mut current = self.lock();
            let run = current.as_mut()?;
            (Arc::clone(&run.status), run.handle.take()?)
        };

        match handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("[Scraper] Run task failed: {}", e);
                status.finish();
                None
            }
        }
    }

    /// Tests connectivity to every backend enabled in `config`
    pub async fn test_connections(
        config: &Config,
    ) -> Result<Vec<(&'static str, ConnectionStatus)>, DredgerError> {
        let backends = build_backends(config)?;
        let mut results = Vec::with_capacity(backends.len());

        for backend in &backends {
            let status = backend.test_connection().await;
            tracing::info!("[{}] {}", backend.name(), status);
            results.push((backend.name(), status));
        }

        Ok(results)
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        let current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(run) = current.as_ref() {
            run.settle();
        }
        current
    }
}

fn is_active(run: Option<&ActiveRun>) -> bool {
    run.is_some_and(|run| run.status.phase() != RunPhase::Idle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ScraperConfig};

    fn config(mealie: bool, tandoor: bool) -> Config {
        Config {
            mealie: BackendConfig {
                enabled: mealie,
                url: "http://127.0.0.1:1".to_string(),
                credential: "token".to_string(),
            },
            tandoor: BackendConfig {
                enabled: tandoor,
                url: "http://127.0.0.1:1".to_string(),
                credential: "key".to_string(),
            },
            scraper: ScraperConfig::default(),
            active_site_list: "sites.txt".to_string(),
        }
    }

    #[test]
    fn test_status_before_any_run() {
        let supervisor = Supervisor::new();
        let status = supervisor.status();

        assert!(!status.running);
        assert_eq!(status.phase, RunPhase::Idle);
        assert_eq!(status.progress, 0);
        assert!(!supervisor.is_active());
    }

    #[test]
    fn test_stop_without_run() {
        let supervisor = Supervisor::new();
        assert!(matches!(supervisor.stop(), Err(DredgerError::NotRunning)));
    }

    #[test]
    fn test_start_requires_backend() {
        let supervisor = Supervisor::new();
        let result = supervisor.start(&config(false, false), vec!["https://a.test".to_string()]);
        assert!(matches!(result, Err(DredgerError::NoBackendEnabled)));
    }

    #[test]
    fn test_start_requires_sites() {
        let supervisor = Supervisor::new();
        let result = supervisor.start(&config(true, false), Vec::new());
        assert!(matches!(result, Err(DredgerError::NoSites)));
    }

    #[tokio::test]
    async fn test_wait_without_run() {
        let supervisor = Supervisor::new();
        assert!(supervisor.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_connections_only_for_enabled_backends() {
        let results = Supervisor::test_connections(&config(false, true)).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "Tandoor");
        assert!(!results[0].1.is_ok());
    }
}
