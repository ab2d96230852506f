//! Reference linker - the core of the build.
//!
//! Producers register `(Reference, output path, Resource)` triples without
//! knowing where anything else ends up. [`Linker::link`] then computes the
//! closure of the entry references and materializes exactly that closure,
//! resolving cross-resource locations at write time.
//!
//! # Module Structure
//!
//! - [`reference`]: opaque content identity
//! - [`resource`]: `Static | Link | Rendered` producers
//! - [`linker`]: registration maps, closure discovery, materialization
//! - [`error`]: `LinkError`
//! - [`path`]: lexical output-path helpers
//!
//! # Usage
//!
//! ```ignore
//! let mut linker = Linker::new(staging.path());
//! linker.add_resource("a", "a.txt", Resource::copy("src/a.txt"))?;
//! linker.add_resource("b", "index.html", Resource::link("a"))?;
//! let report = linker.link([Reference::new("b")])?;
//! ```

mod error;
mod linker;
pub mod path;
mod reference;
mod resource;

pub use error::LinkError;
pub use linker::{LinkReport, Linker, UrlStyle};
pub use reference::Reference;
pub use resource::Resource;
