//! Site building orchestration.
//!
//! Build phases:
//! - **Stage** - fresh staging directory next to the output
//! - **Register** - assets, rendered documents, index redirect
//! - **Link** - closure of the documents, materialized in parallel
//! - **Promote** - staged tree replaces the previous output
//! - **Archive** - optional `.tar.gz` of the promoted output

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::common::{kind_totals, register_site};
use crate::config::Manifest;
use crate::link::{LinkReport, Linker};
use crate::logger::ProgressLine;
use crate::stage::Staging;
use crate::utils::{exec::Cmd, plural_count};
use crate::{debug, debug_do, log};

/// Build the site described by `manifest`.
///
/// On any failure the previous output is left untouched.
pub fn build_site(manifest: &Manifest, quiet: bool) -> Result<LinkReport> {
    let staging = Staging::new(&manifest.build.output)?;
    let mut linker = Linker::new(staging.path()).with_url_style(manifest.site.urls);
    let entries = register_site(manifest, &mut linker)?;

    let report = if quiet {
        linker.link(entries)?
    } else {
        let closure = linker.closure(entries.iter().cloned())?;
        let progress = ProgressLine::new("build", &kind_totals(&linker, &closure));
        let report = linker.link_with(entries, |resource| progress.inc(resource.kind()))?;
        progress.finish();
        report
    };

    staging.promote()?;

    if let Some(archive) = &manifest.build.archive {
        write_archive(&manifest.build.output, &manifest.site.root, archive)?;
        if !quiet {
            log!("archive"; "wrote {}", archive.display());
        }
    }

    if !quiet {
        log_summary(&report, &manifest.build.output);
    }
    Ok(report)
}

fn log_summary(report: &LinkReport, output: &Path) {
    log!(
        "build";
        "{} into {} ({} copied, {} linked, {} rendered)",
        plural_count(report.written.len(), "resource"),
        output.display(),
        report.count("static"),
        report.count("link"),
        report.count("rendered"),
    );
    debug_do! {
        for entry in &report.written {
            log!("build"; "{} -> {}", entry.reference, entry.path.display());
        }
    }
    if !report.skipped.is_empty() {
        let skipped = plural_count(report.skipped.len(), "resource");
        log!("build"; "{} not referenced, skipped", skipped);
    }
}

/// Write a gzip tarball of the site tree to `archive` using the system `tar`.
///
/// Runs inside `output`, so the top-level entry is `site_root` (or `.` when
/// the site is not nested).
fn write_archive(output: &Path, site_root: &Path, archive: &Path) -> Result<()> {
    let entry = if site_root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        site_root
    };
    if let Some(dir) = archive.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create archive directory `{}`", dir.display()))?;
    }

    debug!(
        "archive";
        "tar -czf {} {} (in {})",
        archive.display(),
        entry.display(),
        output.display()
    );
    Cmd::new("tar")
        .args([OsStr::new("-czf"), archive.as_os_str(), entry.as_os_str()])
        .cwd(output)
        .run()
        .with_context(|| format!("failed to archive `{}`", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::tests::{SITE, write_site};
    use crate::config::test_manifest;
    use crate::link::LinkError;
    use tempfile::TempDir;

    fn build(root: &Path, manifest: &str) -> Result<LinkReport> {
        let manifest = test_manifest(root, manifest);
        build_site(&manifest, true)
    }

    #[test]
    fn test_build_writes_closure() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let report = build(dir.path(), SITE).unwrap();

        let out = dir.path().join("public/site");
        assert_eq!(
            fs::read_to_string(out.join("assets/style.css")).unwrap(),
            "body { color: black; }"
        );
        assert!(out.join("intro.html").is_file());
        assert!(out.join("guide.html").is_file());
        // Declared but never referenced
        assert!(!out.join("assets/unused.png").exists());
        assert_eq!(report.skipped, ["img/unused.png"]);
        assert_eq!(report.count("rendered"), 2);
        assert_eq!(report.count("static"), 1);
    }

    #[test]
    fn test_build_rendered_links() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        build(dir.path(), SITE).unwrap();

        let intro = fs::read_to_string(dir.path().join("public/site/intro.html")).unwrap();
        assert!(intro.starts_with("<!DOCTYPE html>"));
        assert!(intro.contains(r#"href="/site/assets/style.css""#));
        assert!(intro.contains(r#"href="/site/guide.html#setup""#));
        assert!(intro.contains("<title>Welcome</title>"));
        assert!(intro.contains("The Guide"));
    }

    #[test]
    fn test_build_relative_urls() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let manifest = SITE.replace("[site]", "[site]\nurls = \"relative\"");
        build(dir.path(), &manifest).unwrap();

        let intro = fs::read_to_string(dir.path().join("public/site/intro.html")).unwrap();
        assert!(intro.contains(r#"href="assets/style.css""#));
        assert!(intro.contains(r#"href="guide.html#setup""#));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_index_redirect() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        build(dir.path(), SITE).unwrap();

        let index = dir.path().join("public/site/index.html");
        assert_eq!(fs::read_link(&index).unwrap(), Path::new("intro.html"));
        assert!(fs::read_to_string(&index).unwrap().contains("Welcome"));
    }

    #[test]
    fn test_failed_build_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        build(dir.path(), SITE).unwrap();
        let previous = fs::read_to_string(dir.path().join("public/site/intro.html")).unwrap();

        fs::write(dir.path().join("content/intro.md"), "[broken](missing.md)").unwrap();
        let err = build(dir.path(), SITE).unwrap_err();
        let link_err = err.downcast_ref::<LinkError>().unwrap();
        assert!(link_err.is_dangling());

        let current = fs::read_to_string(dir.path().join("public/site/intro.html")).unwrap();
        assert_eq!(current, previous);
        // Staging directory was discarded
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(".public"))
            .collect();
        assert!(names.is_empty(), "leftover staging: {names:?}");
    }

    #[test]
    fn test_build_archive() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let manifest = format!("{SITE}\n[build]\narchive = \"dist/site.tar.gz\"\n");
        build(dir.path(), &manifest).unwrap();

        let archive = dir.path().join("dist/site.tar.gz");
        assert!(archive.is_file());
        let listing = Cmd::new("tar").arg("-tzf").arg(&archive).run().unwrap();
        let listing = String::from_utf8_lossy(&listing.stdout);
        assert!(listing.lines().any(|line| line.trim_end_matches('/') == "site"));
        assert!(listing.contains("site/intro.html"));
        assert!(!listing.contains("public/"));
    }

    #[test]
    fn test_build_archive_without_site_root() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        let manifest = SITE.replace("root = \"site\"\n", "")
            + "\n[build]\narchive = \"dist/site.tar.gz\"\n";
        build(dir.path(), &manifest).unwrap();

        let archive = dir.path().join("dist/site.tar.gz");
        let listing = Cmd::new("tar").arg("-tzf").arg(&archive).run().unwrap();
        let listing = String::from_utf8_lossy(&listing.stdout);
        assert!(listing.contains("./intro.html"));
        assert!(!listing.contains("public/"));
    }
}
