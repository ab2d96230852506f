//! Site registration shared by `build` and `check`.

use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::{DocumentEntry, INDEX_REFERENCE, Manifest};
use crate::{debug, log};
use crate::link::{LinkError, Linker, Reference, Resource};
use crate::page::{Fragment, MarkdownOptions, NavItem, Shell, from_markdown};
use crate::utils::plural_count;

/// A document read and converted, not yet wrapped in the page shell.
struct LoadedDocument<'a> {
    entry: &'a DocumentEntry,
    title: String,
    body: Fragment,
}

/// Register every asset, document and the index redirect on `linker`.
///
/// Returns the link entries: all documents, then the index redirect.
pub fn register_site(manifest: &Manifest, linker: &mut Linker) -> Result<Vec<Reference>> {
    for asset in &manifest.assets {
        linker.add_resource(
            asset.src.clone(),
            manifest.asset_output(asset),
            Resource::copy(asset.path.clone()),
        )?;
    }

    let options = MarkdownOptions::all();
    let documents = manifest
        .documents
        .par_iter()
        .map(|entry| load_document(entry, &options))
        .collect::<Result<Vec<_>>>()?;

    let shell = Shell {
        style: manifest.site.style.clone(),
        nav: documents
            .iter()
            .map(|doc| NavItem {
                title: doc.title.clone(),
                target: doc.entry.src.clone(),
            })
            .collect(),
    };

    let mut entries = Vec::with_capacity(documents.len() + 1);
    for doc in documents {
        let page = shell.page(&doc.entry.src, &doc.title, doc.body);
        linker.add_resource(
            doc.entry.src.clone(),
            manifest.document_output(doc.entry),
            Resource::rendered(page),
        )?;
        entries.push(doc.entry.src.clone());
    }

    if let Some(index) = &manifest.site.index {
        let reference = Reference::new(INDEX_REFERENCE);
        linker.add_resource(
            reference.clone(),
            manifest.index_output(),
            Resource::link(index.clone()),
        )?;
        entries.push(reference);
    }

    if linker.is_empty() {
        log!("warning"; "manifest declares no assets or documents");
    }
    debug!("link"; "registered {}", plural_count(linker.len(), "resource"));
    Ok(entries)
}

/// Read and convert one document. Title: manifest, then first heading, then file stem.
fn load_document<'a>(
    entry: &'a DocumentEntry,
    options: &MarkdownOptions,
) -> Result<LoadedDocument<'a>> {
    let content = fs::read_to_string(&entry.path)
        .with_context(|| format!("failed to read document `{}`", entry.path.display()))?;
    let page = from_markdown(entry.src.as_str(), &content, options);

    let title = entry
        .title
        .clone()
        .or(page.title)
        .unwrap_or_else(|| {
            entry
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.src.to_string())
        });

    Ok(LoadedDocument {
        entry,
        title,
        body: page.body,
    })
}

/// Fix hint for a failed build or check, when the failure is a linker error.
pub fn link_hint(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<LinkError>()?;
    if err.is_dangling() {
        Some("declare the target as an [[asset]] or [[document]], or fix the link")
    } else if err.is_conflict() {
        Some("give each entry a distinct src and output name")
    } else {
        None
    }
}

/// Count closure members per resource kind, in progress display order.
pub fn kind_totals<'a, I>(linker: &Linker, members: I) -> [(&'static str, usize); 3]
where
    I: IntoIterator<Item = &'a Reference>,
{
    let mut totals = [("static", 0), ("link", 0), ("rendered", 0)];
    for reference in members {
        if let Some(resource) = linker.get(reference)
            && let Some(slot) = totals.iter_mut().find(|(kind, _)| *kind == resource.kind())
        {
            slot.1 += 1;
        }
    }
    totals
}
