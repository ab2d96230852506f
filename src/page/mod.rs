//! Rendered page content.
//!
//! - [`fragment`]: content tree with embedded references
//! - [`render`]: HTML serialization, references resolved through a callback
//! - [`markdown`]: markdown source -> fragment
//! - [`shell`]: full-page wrapper (head, title block, navigation)

mod fragment;
pub mod markdown;
mod render;
mod shell;

pub use fragment::{AttrValue, Element, Fragment, el, h};
pub use markdown::{MarkdownOptions, from_markdown};
pub use render::render;
pub use shell::{NavItem, Shell};
