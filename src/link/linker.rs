//! Linker - registration, closure discovery and materialization.
//!
//! One `Linker` is one build session:
//!
//! ```text
//! add_resource* ──► link(entries)
//!                     ├─ closure discovery   (no filesystem access)
//!                     └─ materialization     (parallel, one entry per reference)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::debug;

use super::path::{normalize_output_path, relative_path, to_url_path};
use super::{LinkError, Reference, Resource};

/// Characters kept verbatim inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// How rendered resources spell the location of a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
    /// `/` + registered path (site-root absolute).
    #[default]
    Root,
    /// Path relative to the rendering page's own directory.
    Relative,
}

/// One build session: owns the registration maps and the output root.
#[derive(Debug)]
pub struct Linker {
    root: PathBuf,
    url_style: UrlStyle,
    /// Reference -> Resource
    resources: FxHashMap<Reference, Resource>,
    /// Reference -> relative output path
    links: FxHashMap<Reference, PathBuf>,
    /// Relative output path -> Reference (collision detection only)
    owners: FxHashMap<PathBuf, Reference>,
}

impl Linker {
    /// Create an empty session writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_style: UrlStyle::default(),
            resources: FxHashMap::default(),
            links: FxHashMap::default(),
            owners: FxHashMap::default(),
        }
    }

    /// Set how rendered resources spell reference locations.
    pub const fn with_url_style(mut self, style: UrlStyle) -> Self {
        self.url_style = style;
        self
    }

    /// Output root of this session.
    #[cfg(test)]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Check if a reference is registered.
    #[cfg(test)]
    pub fn contains(&self, reference: &Reference) -> bool {
        self.resources.contains_key(reference)
    }

    /// Registered resource of a reference.
    pub fn get(&self, reference: &Reference) -> Option<&Resource> {
        self.resources.get(reference)
    }

    /// Register `resource` under `reference`, to be written at `out` (relative to root).
    ///
    /// All checks happen before any map is touched, so a rejected
    /// registration leaves the session unchanged.
    pub fn add_resource(
        &mut self,
        reference: impl Into<Reference>,
        out: impl AsRef<Path>,
        resource: Resource,
    ) -> Result<(), LinkError> {
        let reference = reference.into();
        let out = out.as_ref();

        if self.resources.contains_key(&reference) || self.links.contains_key(&reference) {
            return Err(LinkError::DuplicateReference { reference });
        }
        let Some(path) = normalize_output_path(out) else {
            return Err(LinkError::InvalidPath {
                reference,
                path: out.to_path_buf(),
            });
        };
        if let Some(existing) = self.owners.get(&path) {
            return Err(LinkError::DuplicatePath {
                path,
                existing: existing.clone(),
                reference,
            });
        }

        debug!("link"; "register {} -> {} ({})", reference, path.display(), resource.kind());
        self.resources.insert(reference.clone(), resource);
        self.links.insert(reference.clone(), path.clone());
        self.owners.insert(path, reference);
        Ok(())
    }

    /// Resolve a reference to its output path.
    ///
    /// Returns the registered relative path, or the path joined onto the
    /// output root when `absolute` is set.
    pub fn resolve(&self, reference: &Reference, absolute: bool) -> Result<PathBuf, LinkError> {
        let rel = self
            .links
            .get(reference)
            .ok_or_else(|| LinkError::DanglingReference {
                reference: reference.clone(),
                referrer: None,
            })?;
        Ok(if absolute {
            self.root.join(rel)
        } else {
            rel.clone()
        })
    }

    /// Spell the location of `reference` as seen from the file at `from`.
    ///
    /// `from` is the absolute output path of the resource being rendered.
    pub fn url_for(&self, reference: &Reference, from: &Path) -> Result<String, LinkError> {
        let url = match self.url_style {
            UrlStyle::Root => format!("/{}", to_url_path(&self.resolve(reference, false)?)),
            UrlStyle::Relative => {
                let target = self.resolve(reference, true)?;
                let base = from.parent().unwrap_or_else(|| Path::new(""));
                to_url_path(&relative_path(base, &target))
            }
        };
        Ok(encode_url_path(&url))
    }

    /// Compute the set of references reachable from `entries`, entries included.
    ///
    /// Iterative frontier expansion. Fails on the first reference that has
    /// no registered resource; never touches the filesystem.
    pub fn closure<I>(&self, entries: I) -> Result<FxHashSet<Reference>, LinkError>
    where
        I: IntoIterator<Item = Reference>,
    {
        let mut closure = FxHashSet::default();
        let mut frontier: Vec<(Reference, Option<Reference>)> =
            entries.into_iter().map(|r| (r, None)).collect();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for (reference, referrer) in frontier {
                if closure.contains(&reference) {
                    continue;
                }
                let Some(resource) = self.resources.get(&reference) else {
                    return Err(LinkError::DanglingReference {
                        reference,
                        referrer,
                    });
                };

                let mut deps: Vec<_> = resource
                    .references()
                    .into_iter()
                    .filter(|dep| !closure.contains(dep))
                    .collect();
                deps.sort();
                next.extend(deps.into_iter().map(|dep| (dep, Some(reference.clone()))));

                closure.insert(reference);
            }
            frontier = next;
        }

        Ok(closure)
    }

    /// Link the session: discover the closure of `entries`, then write every
    /// resource in it under the output root.
    ///
    /// Consumes the session; a linker cannot be linked twice.
    pub fn link<I>(self, entries: I) -> Result<LinkReport, LinkError>
    where
        I: IntoIterator<Item = Reference>,
    {
        self.link_with(entries, |_| {})
    }

    /// Like [`link`](Self::link), calling `on_written` after each resource is materialized.
    ///
    /// `on_written` runs on worker threads, in no particular order.
    pub fn link_with<I, F>(self, entries: I, on_written: F) -> Result<LinkReport, LinkError>
    where
        I: IntoIterator<Item = Reference>,
        F: Fn(&Resource) + Sync,
    {
        let closure = self.closure(entries)?;
        debug!("link"; "closure: {} of {} resources", closure.len(), self.len());

        // Sorted by output path so reports are deterministic
        let mut members: Vec<(&Reference, &Path)> = closure
            .iter()
            .filter_map(|r| self.links.get(r).map(|p| (r, p.as_path())))
            .collect();
        members.sort_by(|a, b| a.1.cmp(b.1));

        members.par_iter().try_for_each(|(reference, _)| {
            let resource = self.materialize(reference)?;
            on_written(resource);
            Ok::<_, LinkError>(())
        })?;

        let written = members
            .iter()
            .filter_map(|(reference, path)| {
                let kind = self.resources.get(*reference)?.kind();
                Some(LinkedEntry {
                    reference: (*reference).clone(),
                    path: path.to_path_buf(),
                    kind,
                })
            })
            .collect();

        let mut skipped: Vec<Reference> = self
            .resources
            .keys()
            .filter(|r| !closure.contains(*r))
            .cloned()
            .collect();
        skipped.sort();
        for reference in &skipped {
            debug!("link"; "skipped unreachable {}", reference);
        }

        Ok(LinkReport { written, skipped })
    }

    /// Write one resource. Its resource and path are looked up here, per reference.
    fn materialize(&self, reference: &Reference) -> Result<&Resource, LinkError> {
        let resource =
            self.resources
                .get(reference)
                .ok_or_else(|| LinkError::DanglingReference {
                    reference: reference.clone(),
                    referrer: None,
                })?;
        let path = self.resolve(reference, true)?;

        // create_dir_all tolerates concurrent creation of shared parents
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LinkError::io(parent, e))?;
        }
        resource.populate_fs(&path, self)?;
        Ok(resource)
    }
}

/// Percent-encode each segment of a `/`-separated URL path.
fn encode_url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// A materialized reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedEntry {
    pub reference: Reference,
    /// Path relative to the output root
    pub path: PathBuf,
    /// Resource kind (`static`, `link`, `rendered`)
    pub kind: &'static str,
}

/// Outcome of a successful `link` call.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    /// Materialized references, sorted by output path
    pub written: Vec<LinkedEntry>,
    /// Registered references outside the closure, sorted
    pub skipped: Vec<Reference>,
}

impl LinkReport {
    /// Number of materialized resources of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.written.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{AttrValue, Fragment, h};
    use tempfile::TempDir;

    fn r(id: &str) -> Reference {
        Reference::new(id)
    }

    /// Write a source file under `dir` and return a static resource for it.
    fn source(dir: &Path, name: &str, content: &str) -> Resource {
        let path = dir.join("src").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        Resource::copy(path)
    }

    /// Rendered resource that depends on each of `deps`.
    fn page_with_refs(deps: &[&str]) -> Resource {
        let parts = deps
            .iter()
            .map(|d| h("a", [("href", AttrValue::from(r(d)))], Fragment::text(*d)))
            .collect();
        Resource::rendered(Fragment::Mixed(parts))
    }

    /// Collect every filesystem entry under `root`, relative, sorted.
    fn tree(root: &Path) -> Vec<PathBuf> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                let meta = fs::symlink_metadata(&path).unwrap();
                if meta.is_dir() {
                    walk(root, &path, out);
                } else {
                    out.push(path.strip_prefix(root).unwrap().to_path_buf());
                }
            }
        }
        let mut out = Vec::new();
        if root.exists() {
            walk(root, root, &mut out);
        }
        out.sort();
        out
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    #[test]
    fn test_distinct_registrations_succeed() {
        let mut linker = Linker::new("out");
        for i in 0..20 {
            let out = format!("dir{}/f{i}.txt", i % 3);
            linker
                .add_resource(format!("ref{i}").as_str(), out, Resource::copy("x"))
                .unwrap();
        }
        assert_eq!(linker.len(), 20);
    }

    #[test]
    fn test_duplicate_reference_rejected_without_mutation() {
        let mut linker = Linker::new("out");
        linker.add_resource("a", "a.txt", Resource::copy("x")).unwrap();

        let err = linker
            .add_resource("a", "other.txt", Resource::copy("y"))
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, LinkError::DuplicateReference { .. }));

        assert_eq!(linker.len(), 1);
        assert_eq!(linker.resolve(&r("a"), false).unwrap(), PathBuf::from("a.txt"));
        assert!(!linker.owners.contains_key(Path::new("other.txt")));
    }

    #[test]
    fn test_duplicate_path_rejected_without_mutation() {
        let mut linker = Linker::new("out");
        linker.add_resource("a", "a.txt", Resource::copy("x")).unwrap();

        let err = linker
            .add_resource("b", "./a.txt", Resource::copy("y"))
            .unwrap_err();
        match err {
            LinkError::DuplicatePath { existing, reference, .. } => {
                assert_eq!(existing, "a");
                assert_eq!(reference, "b");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(linker.len(), 1);
        assert!(!linker.contains(&r("b")));
        assert!(linker.resolve(&r("b"), false).is_err());
    }

    #[test]
    fn test_invalid_output_paths_rejected() {
        let mut linker = Linker::new("out");
        for bad in ["", "/abs.txt", "../escape.txt", "a/../../b.txt"] {
            let err = linker.add_resource("a", bad, Resource::copy("x")).unwrap_err();
            assert!(matches!(err, LinkError::InvalidPath { .. }), "{bad}");
        }
        assert!(linker.is_empty());
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_relative_and_absolute() {
        let mut linker = Linker::new("/srv/out");
        linker
            .add_resource("style", "site/assets/style.css", Resource::copy("x"))
            .unwrap();

        assert_eq!(
            linker.resolve(&r("style"), false).unwrap(),
            PathBuf::from("site/assets/style.css")
        );
        assert_eq!(
            linker.resolve(&r("style"), true).unwrap(),
            PathBuf::from("/srv/out/site/assets/style.css")
        );
    }

    #[test]
    fn test_resolve_unregistered_is_dangling() {
        let linker = Linker::new("out");
        let err = linker.resolve(&r("ghost"), false).unwrap_err();
        assert!(err.is_dangling());
    }

    #[test]
    fn test_url_for_root_style() {
        let mut linker = Linker::new("/out");
        linker
            .add_resource("img", "site/assets/my photo.png", Resource::copy("x"))
            .unwrap();
        let url = linker
            .url_for(&r("img"), Path::new("/out/site/docs/page.html"))
            .unwrap();
        assert_eq!(url, "/site/assets/my%20photo.png");
    }

    #[test]
    fn test_url_for_relative_style() {
        let mut linker = Linker::new("/out").with_url_style(UrlStyle::Relative);
        linker
            .add_resource("style", "site/assets/style.css", Resource::copy("x"))
            .unwrap();
        let url = linker
            .url_for(&r("style"), Path::new("/out/site/docs/page.html"))
            .unwrap();
        assert_eq!(url, "../assets/style.css");
    }

    // ------------------------------------------------------------------------
    // Closure
    // ------------------------------------------------------------------------

    #[test]
    fn test_closure_is_least_fixed_point() {
        let mut linker = Linker::new("out");
        // a -> b -> c, c -> a (cycle), d -> e, f isolated
        linker.add_resource("a", "a.html", page_with_refs(&["b"])).unwrap();
        linker.add_resource("b", "b.html", page_with_refs(&["c"])).unwrap();
        linker.add_resource("c", "c.html", page_with_refs(&["a"])).unwrap();
        linker.add_resource("d", "d.html", page_with_refs(&["e"])).unwrap();
        linker.add_resource("e", "e.txt", Resource::copy("x")).unwrap();
        linker.add_resource("f", "f.txt", Resource::copy("x")).unwrap();

        let closure = linker.closure([r("a")]).unwrap();
        let mut ids: Vec<_> = closure.iter().map(Reference::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["a", "b", "c"]);

        let closure = linker.closure([r("d"), r("f")]).unwrap();
        let mut ids: Vec<_> = closure.iter().map(Reference::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["d", "e", "f"]);
    }

    #[test]
    fn test_closure_includes_entries_without_dependencies() {
        let mut linker = Linker::new("out");
        linker.add_resource("a", "a.txt", Resource::copy("x")).unwrap();
        let closure = linker.closure([r("a")]).unwrap();
        assert_eq!(closure.len(), 1);
        assert!(closure.contains("a"));
    }

    #[test]
    fn test_closure_unregistered_entry_is_dangling() {
        let linker = Linker::new("out");
        let err = linker.closure([r("missing")]).unwrap_err();
        match err {
            LinkError::DanglingReference { reference, referrer } => {
                assert_eq!(reference, "missing");
                assert!(referrer.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ------------------------------------------------------------------------
    // Link
    // ------------------------------------------------------------------------

    #[cfg(unix)]
    #[test]
    fn test_scenario_link_pulls_in_target() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker
            .add_resource("a", "a.txt", source(dir.path(), "a.txt", "hello"))
            .unwrap();
        linker.add_resource("b", "index.html", Resource::link("a")).unwrap();

        let report = linker.link([r("b")]).unwrap();

        assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "hello");
        let index = out.join("index.html");
        assert!(fs::symlink_metadata(&index).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&index).unwrap(), PathBuf::from("a.txt"));
        assert_eq!(fs::read_to_string(&index).unwrap(), "hello");

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.count("static"), 1);
        assert_eq!(report.count("link"), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_scenario_dangling_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker.add_resource("x", "x.html", page_with_refs(&["y"])).unwrap();

        let err = linker.link([r("x")]).unwrap_err();
        match err {
            LinkError::DanglingReference { reference, referrer } => {
                assert_eq!(reference, "y");
                assert_eq!(referrer, Some(r("x")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.join("x.html").exists());
        assert!(!out.exists());
    }

    #[test]
    fn test_scenario_shared_parent_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker
            .add_resource("f", "a/f.txt", source(dir.path(), "f.txt", "eff"))
            .unwrap();
        linker
            .add_resource("g", "a/g.txt", source(dir.path(), "g.txt", "gee"))
            .unwrap();

        linker.link([r("f"), r("g")]).unwrap();

        assert!(out.join("a").is_dir());
        assert_eq!(fs::read_to_string(out.join("a/f.txt")).unwrap(), "eff");
        assert_eq!(fs::read_to_string(out.join("a/g.txt")).unwrap(), "gee");
    }

    #[test]
    fn test_existing_parent_directory_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("a")).unwrap();

        let mut linker = Linker::new(&out);
        linker
            .add_resource("f", "a/f.txt", source(dir.path(), "f.txt", "eff"))
            .unwrap();
        linker.link([r("f")]).unwrap();
        assert!(out.join("a/f.txt").is_file());
    }

    #[test]
    fn test_only_closure_is_materialized() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker
            .add_resource("used", "assets/used.css", source(dir.path(), "used.css", "a{}"))
            .unwrap();
        linker
            .add_resource("unused", "assets/unused.css", source(dir.path(), "unused.css", "b{}"))
            .unwrap();
        linker
            .add_resource("page", "page.html", page_with_refs(&["used"]))
            .unwrap();

        let report = linker.link([r("page")]).unwrap();

        assert_eq!(
            tree(&out),
            [PathBuf::from("assets/used.css"), PathBuf::from("page.html")]
        );
        assert_eq!(report.skipped, [r("unused")]);
        let paths: Vec<_> = report.written.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            [PathBuf::from("assets/used.css"), PathBuf::from("page.html")]
        );
    }

    #[test]
    fn test_rendered_references_resolved_late() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker
            .add_resource("page", "docs/page.html", page_with_refs(&["other"]))
            .unwrap();
        linker
            .add_resource("other", "docs/other.html", page_with_refs(&[]))
            .unwrap();

        linker.link([r("page")]).unwrap();

        let html = fs::read_to_string(out.join("docs/page.html")).unwrap();
        assert_eq!(html, r#"<a href="/docs/other.html">other</a>"#);
    }

    #[test]
    fn test_on_written_called_once_per_member() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = TempDir::new().unwrap();
        let mut linker = Linker::new(dir.path().join("out"));
        for i in 0..16 {
            linker
                .add_resource(
                    format!("r{i}").as_str(),
                    format!("d{}/r{i}.txt", i % 4),
                    source(dir.path(), &format!("r{i}.txt"), "x"),
                )
                .unwrap();
        }

        let calls = AtomicUsize::new(0);
        let entries: Vec<_> = (0..16).map(|i| r(&format!("r{i}"))).collect();
        let report = linker
            .link_with(entries, |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 16);
        assert_eq!(report.written.len(), 16);
    }

    #[test]
    fn test_io_error_aborts_link() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut linker = Linker::new(&out);
        linker
            .add_resource("a", "a.txt", Resource::copy(dir.path().join("missing.txt")))
            .unwrap();
        let err = linker.link([r("a")]).unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
    }

    // ------------------------------------------------------------------------
    // Determinism and relocation
    // ------------------------------------------------------------------------

    /// Build the same session into `out`.
    fn build_sample(src: &Path, out: &Path) {
        let mut linker = Linker::new(out).with_url_style(UrlStyle::Relative);
        linker
            .add_resource("logo", "site/assets/logo.svg", source(src, "logo.svg", "<svg/>"))
            .unwrap();
        linker
            .add_resource("intro", "site/intro.html", page_with_refs(&["logo", "guide"]))
            .unwrap();
        linker
            .add_resource("guide", "site/guide/index.html", page_with_refs(&["intro"]))
            .unwrap();
        linker
            .add_resource("_index", "site/index.html", Resource::link("intro"))
            .unwrap();
        linker.link([r("_index")]).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_identical_sessions_produce_identical_trees() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        build_sample(dir.path(), &first);
        build_sample(dir.path(), &second);

        let entries = tree(&first);
        assert_eq!(entries, tree(&second));
        for entry in &entries {
            let (a, b) = (first.join(entry), second.join(entry));
            if fs::symlink_metadata(&a).unwrap().file_type().is_symlink() {
                assert_eq!(fs::read_link(&a).unwrap(), fs::read_link(&b).unwrap());
            } else {
                assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tree_survives_relocation() {
        let dir = TempDir::new().unwrap();
        let built = dir.path().join("built");
        build_sample(dir.path(), &built);

        let moved = dir.path().join("elsewhere/moved");
        fs::create_dir_all(moved.parent().unwrap()).unwrap();
        fs::rename(&built, &moved).unwrap();

        let index = moved.join("site/index.html");
        assert_eq!(fs::read_link(&index).unwrap(), PathBuf::from("intro.html"));
        let html = fs::read_to_string(&index).unwrap();
        assert!(html.contains(r#"href="assets/logo.svg""#));
        assert!(html.contains(r#"href="guide/index.html""#));

        let guide = fs::read_to_string(moved.join("site/guide/index.html")).unwrap();
        assert!(guide.contains(r#"href="../intro.html""#));
    }
}
