//! Build manifest (`strand.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # manifest discovery
//! └── mod.rs     # Manifest (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `[site]`       | Output layout: root prefix, index, stylesheet     |
//! | `[build]`      | Output directory and optional archive             |
//! | `[[asset]]`    | Static files, copied verbatim when referenced     |
//! | `[[document]]` | Markdown documents, always built                  |
//!
//! # Example
//!
//! ```toml
//! [site]
//! root = "site"
//! index = "docs/intro.md"
//! style = "theme/style.css"
//!
//! [[asset]]
//! src = "theme/style.css"
//! path = "theme/style.css"
//!
//! [[document]]
//! src = "docs/intro.md"
//! path = "content/intro.md"
//! ```

mod error;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
use util::find_config_file;

use crate::{
    cli::{BuildArgs, Cli, Commands},
    link::{Reference, UrlStyle},
    log,
};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Reference of the generated index redirect.
pub const INDEX_REFERENCE: &str = "_index";

// ============================================================================
// sections
// ============================================================================

/// `[site]` section: layout of the output tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Prefix of every output path inside the build output
    pub root: PathBuf,
    /// Document the generated `index.html` links to
    pub index: Option<Reference>,
    /// Asset linked as stylesheet from every page
    pub style: Option<Reference>,
    /// How pages spell links to other resources
    pub urls: UrlStyle,
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Output directory (relative to the manifest)
    pub output: PathBuf,
    /// Write a `.tar.gz` of the output here after a successful build
    pub archive: Option<PathBuf>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("public"),
            archive: None,
        }
    }
}

/// `[[asset]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Reference identifier
    pub src: Reference,
    /// Source file (relative to the manifest)
    pub path: PathBuf,
}

/// `[[document]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Reference identifier
    pub src: Reference,
    /// Markdown source file (relative to the manifest)
    pub path: PathBuf,
    /// Page title; defaults to the first `# heading`, then the file stem
    pub title: Option<String>,
}

// ============================================================================
// root configuration
// ============================================================================

/// Root structure of `strand.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Project root directory - parent of the manifest (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetEntry>,

    #[serde(default, rename = "document")]
    pub documents: Vec<DocumentEntry>,
}

impl Manifest {
    /// Load the manifest named on the command line.
    ///
    /// Searches upward from cwd; the project root is the manifest's directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let Some(config_path) = find_config_file(&cli.config, &cwd) else {
            bail!(ConfigError::Validation(format!(
                "manifest `{}` not found in `{}` or any parent directory",
                cli.config.display(),
                cwd.display()
            )));
        };

        let mut manifest = Self::from_path(&config_path)?;
        manifest.root = crate::utils::path::normalize_path(&config_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        manifest.apply_command_options(cli);
        manifest.normalize_paths();
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (manifest, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(manifest)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let manifest = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((manifest, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } | Commands::Check { build_args } => {
                self.apply_build_args(build_args);
            }
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.site.urls, args.urls.as_ref());
        if args.archive.is_some() {
            self.build.archive.clone_from(&args.archive);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every filesystem path against the project root.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        let normalize = |p: &Path| crate::utils::path::normalize_path(&root.join(p));

        self.build.output = normalize(&self.build.output);
        self.build.archive = self.build.archive.as_deref().map(normalize);
        for asset in &mut self.assets {
            asset.path = normalize(&asset.path);
        }
        for document in &mut self.documents {
            document.path = normalize(&document.path);
        }
    }

    // ========================================================================
    // output layout
    // ========================================================================

    /// Output path of an asset: `<root>/assets/<basename>`.
    pub fn asset_output(&self, asset: &AssetEntry) -> PathBuf {
        self.site.root.join("assets").join(basename(asset.src.as_str()))
    }

    /// Output path of a document: `<root>/<stem>.html`.
    pub fn document_output(&self, document: &DocumentEntry) -> PathBuf {
        let name = basename(document.src.as_str());
        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        self.site.root.join(format!("{stem}.html"))
    }

    /// Output path of the index redirect: `<root>/index.html`.
    pub fn index_output(&self) -> PathBuf {
        self.site.root.join("index.html")
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the manifest, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.validate_entries(&mut diag);
        self.validate_site(&mut diag);
        self.validate_outputs(&mut diag);

        if self.build.output.as_os_str().is_empty() || self.build.output == self.root {
            diag.error_with_hint(
                "build.output",
                "output directory must be a subdirectory of the project",
                "the output is replaced on every build",
            );
        }
        if let Some(archive) = &self.build.archive
            && archive.starts_with(&self.build.output)
        {
            diag.error_with_hint(
                "build.archive",
                format!("archive `{}` is inside the output directory", archive.display()),
                "the output is replaced on every build; write the archive elsewhere",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Identifiers must be unique and non-empty, sources must exist.
    fn validate_entries(&self, diag: &mut ConfigDiagnostics) {
        let mut seen: FxHashMap<&str, String> = FxHashMap::default();
        let entries = self
            .assets
            .iter()
            .enumerate()
            .map(|(i, a)| (format!("asset[{i}]"), &a.src, &a.path))
            .chain(
                self.documents
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (format!("document[{i}]"), &d.src, &d.path)),
            );

        for (field, src, path) in entries {
            if src.as_str().trim().is_empty() {
                diag.error(format!("{field}.src"), "must not be empty");
                continue;
            }
            if src == INDEX_REFERENCE {
                diag.error(format!("{field}.src"), format!("`{INDEX_REFERENCE}` is reserved"));
            }
            if let Some(prev) = seen.get(src.as_str()) {
                diag.error(
                    format!("{field}.src"),
                    format!("`{src}` is already declared by {prev}"),
                );
            } else {
                seen.insert(src.as_str(), field.clone());
            }
            if !path.is_file() {
                diag.error(
                    format!("{field}.path"),
                    format!("source file `{}` does not exist", path.display()),
                );
            }
        }
    }

    /// `index` must name a document, `style` an asset.
    fn validate_site(&self, diag: &mut ConfigDiagnostics) {
        if let Some(index) = &self.site.index
            && !self.documents.iter().any(|d| &d.src == index)
        {
            diag.error_with_hint(
                "site.index",
                format!("`{index}` is not a declared document"),
                "add a [[document]] entry with this src",
            );
        }
        if let Some(style) = &self.site.style
            && !self.assets.iter().any(|a| &a.src == style)
        {
            diag.error_with_hint(
                "site.style",
                format!("`{style}` is not a declared asset"),
                "add an [[asset]] entry with this src",
            );
        }
    }

    /// No two entries may produce the same output path.
    fn validate_outputs(&self, diag: &mut ConfigDiagnostics) {
        let index = Reference::new(INDEX_REFERENCE);
        let mut tracker = OutputTracker::default();
        for (i, asset) in self.assets.iter().enumerate() {
            tracker.check_and_insert(
                self.asset_output(asset),
                &asset.src,
                format!("asset[{i}].src"),
                diag,
            );
        }
        for (i, document) in self.documents.iter().enumerate() {
            tracker.check_and_insert(
                self.document_output(document),
                &document.src,
                format!("document[{i}].src"),
                diag,
            );
        }
        if self.site.index.is_some() {
            tracker.check_and_insert(self.index_output(), &index, "site.index".into(), diag);
        }
    }
}

/// Last `/`-separated segment of an identifier.
fn basename(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Tracks output paths to detect collisions during validation.
#[derive(Default)]
struct OutputTracker<'a> {
    seen: FxHashMap<PathBuf, &'a Reference>,
}

impl<'a> OutputTracker<'a> {
    /// Check for conflict and insert. Reports error if conflict found.
    fn check_and_insert(
        &mut self,
        output: PathBuf,
        src: &'a Reference,
        field: String,
        diag: &mut ConfigDiagnostics,
    ) {
        if let Some(prev) = self.seen.get(&output) {
            diag.error_with_hint(
                field,
                format!(
                    "output conflict: `{src}` and `{prev}` both output to `{}`",
                    output.display()
                ),
                "rename one of the sources",
            );
        } else {
            self.seen.insert(output, src);
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse a manifest rooted at `root`, resolving paths like `load` does.
/// Panics if there are unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_manifest(root: &Path, content: &str) -> Manifest {
    let (mut manifest, ignored) = Manifest::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test manifest has unknown fields: {:?}",
        ignored
    );
    manifest.root = root.to_path_buf();
    manifest.normalize_paths();
    manifest
}

// ============================================================================
// tests
// ============================================================================
