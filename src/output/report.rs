//! Per-run results returned by the coordinator

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// What happened to one site during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SiteOutcome {
    /// None of the conventional sitemap locations answered
    NoSitemap,

    /// A sitemap was found but yielded no new candidate URLs
    NoCandidates {
        /// The sitemap that was parsed
        sitemap: String,
    },

    /// Candidates were verified and imported
    Processed {
        /// The sitemap that was parsed
        sitemap: String,
        /// Candidate URLs returned by the sitemap parser
        candidates: usize,
        /// Recipes imported (or counted, in dry-run mode) from this site
        imported: u32,
        /// True if the per-site target stopped the candidate loop
        target_reached: bool,
    },
}

impl SiteOutcome {
    /// Recipes imported from this site
    pub fn imported(&self) -> u32 {
        match self {
            Self::Processed { imported, .. } => *imported,
            _ => 0,
        }
    }

    /// Returns true if the site was skipped before any candidate was checked
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Self::Processed { .. })
    }
}

/// Outcome of one site, tagged with the site URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub site: String,
    #[serde(flatten)]
    pub outcome: SiteOutcome,
}

/// Summary of a complete or cancelled run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Sites in the order they were handled; sites never started are absent
    pub sites: Vec<SiteReport>,

    /// Successful imports per backend name
    pub imports_by_backend: BTreeMap<&'static str, u64>,

    /// Recipes imported (or counted, in dry-run mode) across all sites
    pub total_imported: u64,

    /// True if the run ended because stop was requested
    pub cancelled: bool,

    /// True if no backend calls were made for imports
    pub dry_run: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Creates an empty report for a run starting now
    pub fn new(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            sites: Vec::new(),
            imports_by_backend: BTreeMap::new(),
            total_imported: 0,
            cancelled: false,
            dry_run,
            started_at: now,
            finished_at: now,
        }
    }

    /// Records the outcome of one site
    pub fn push_site(&mut self, site: &str, outcome: SiteOutcome) {
        self.total_imported += u64::from(outcome.imported());
        self.sites.push(SiteReport {
            site: site.to_string(),
            outcome,
        });
    }

    /// Counts one successful import into `backend`
    pub fn record_backend_import(&mut self, backend: &'static str) {
        *self.imports_by_backend.entry(backend).or_insert(0) += 1;
    }

    /// Stamps the finish time
    pub fn finish(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
        self.finished_at = Utc::now();
    }

    /// Number of sites skipped for lack of a sitemap or candidates
    pub fn sites_skipped(&self) -> usize {
        self.sites.iter().filter(|s| s.outcome.is_skipped()).count()
    }

    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_site_accumulates_imports() {
        let mut report = RunReport::new(false);
        report.push_site("https://a.test", SiteOutcome::NoSitemap);
        report.push_site(
            "https://b.test",
            SiteOutcome::Processed {
                sitemap: "https://b.test/sitemap.xml".to_string(),
                candidates: 10,
                imported: 3,
                target_reached: false,
            },
        );
        report.push_site(
            "https://c.test",
            SiteOutcome::NoCandidates {
                sitemap: "https://c.test/sitemap.xml".to_string(),
            },
        );

        assert_eq!(report.total_imported, 3);
        assert_eq!(report.sites.len(), 3);
        assert_eq!(report.sites_skipped(), 2);
    }

    #[test]
    fn test_record_backend_import() {
        let mut report = RunReport::new(false);
        report.record_backend_import("Mealie");
        report.record_backend_import("Tandoor");
        report.record_backend_import("Mealie");

        assert_eq!(report.imports_by_backend.get("Mealie"), Some(&2));
        assert_eq!(report.imports_by_backend.get("Tandoor"), Some(&1));
    }

    #[test]
    fn test_site_report_serializes_flat() {
        let report = SiteReport {
            site: "https://a.test".to_string(),
            outcome: SiteOutcome::NoSitemap,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["site"], "https://a.test");
        assert_eq!(json["outcome"], "no_sitemap");
    }
}
