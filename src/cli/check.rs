//! Dry run: validate the manifest and compute what a build would write.

use anyhow::Result;

use super::common::{kind_totals, register_site};
use crate::config::Manifest;
use crate::link::{Linker, Reference};
use crate::utils::plural_count;
use crate::{debug_do, log};

/// Outcome of a check.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// References a build would write, sorted
    pub reachable: Vec<Reference>,
    /// Registered references a build would skip, sorted
    pub skipped: Vec<Reference>,
}

/// Register the site and resolve its closure without touching the filesystem.
///
/// Fails on the same dangling references a build would.
pub fn check_site(manifest: &Manifest) -> Result<CheckReport> {
    let mut linker = Linker::new(&manifest.build.output).with_url_style(manifest.site.urls);
    let entries = register_site(manifest, &mut linker)?;
    let closure = linker.closure(entries)?;

    let mut reachable: Vec<_> = closure.iter().cloned().collect();
    reachable.sort();
    let mut skipped: Vec<_> = manifest
        .assets
        .iter()
        .map(|a| a.src.clone())
        .filter(|r| !closure.contains(r))
        .collect();
    skipped.sort();
    let report = CheckReport { reachable, skipped };

    let totals = kind_totals(&linker, &closure);
    log!(
        "check";
        "{} reachable ({})",
        plural_count(report.reachable.len(), "resource"),
        totals
            .iter()
            .map(|(kind, n)| format!("{kind}: {n}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    debug_do! {
        for reference in &report.reachable {
            if let Ok(path) = linker.resolve(reference, false) {
                log!("check"; "{} -> {}", reference, path.display());
            }
        }
    }
    for reference in &report.skipped {
        log!("check"; "asset `{}` is never referenced", reference);
    }

    Ok(report)
}
