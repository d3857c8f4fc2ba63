//! Human-readable run summary

use crate::output::report::{RunReport, SiteOutcome};

/// Prints a run report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report returned by a finished run
pub fn print_run_summary(report: &RunReport) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Sites handled: {}", report.sites.len());
    println!("  Sites skipped: {}", report.sites_skipped());
    if report.dry_run {
        println!("  Recipes verified (dry run): {}", report.total_imported);
    } else {
        println!("  Recipes imported: {}", report.total_imported);
    }
    println!("  Duration: {}s", report.duration().num_seconds());
    if report.cancelled {
        println!("  Stopped early by request");
    }
    println!();

    if !report.imports_by_backend.is_empty() {
        println!("Imports by Service:");
        for (backend, count) in &report.imports_by_backend {
            println!("  {}: {}", backend, count);
        }
        println!();
    }

    println!("Sites:");
    for site in &report.sites {
        println!("  {} - {}", site.site, describe_outcome(&site.outcome));
    }
}

/// One-line description of a site outcome
pub fn describe_outcome(outcome: &SiteOutcome) -> String {
    match outcome {
        SiteOutcome::NoSitemap => "no sitemap found".to_string(),
        SiteOutcome::NoCandidates { .. } => "no new recipes in sitemap".to_string(),
        SiteOutcome::Processed {
            candidates,
            imported,
            target_reached,
            ..
        } => {
            let mut line = format!("{} imported from {} candidates", imported, candidates);
            if *target_reached {
                line.push_str(" (target reached)");
            }
            line
        }
    }
}
