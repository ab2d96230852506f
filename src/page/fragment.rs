//! Content tree for rendered resources.

use rustc_hash::FxHashSet;

use crate::link::Reference;

/// A piece of page content. Leaves and attribute values may embed references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Text content, escaped on output.
    Text(String),
    /// Markup emitted verbatim (doctype, inline HTML).
    Raw(String),
    /// Sequence of fragments.
    Mixed(Vec<Fragment>),
    /// An HTML element.
    Element(Box<Element>),
    /// Location of another resource, resolved at write time.
    Ref(Reference),
}

/// An HTML element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, AttrValue)>,
    pub content: Fragment,
}

/// Attribute value: literal text or a (possibly anchored) reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Ref {
        reference: Reference,
        /// Suffix kept after the resolved location (`#section`)
        anchor: Option<String>,
    },
}

impl AttrValue {
    /// Reference followed by a `#anchor` suffix.
    pub fn anchored(reference: Reference, anchor: impl Into<String>) -> Self {
        Self::Ref {
            reference,
            anchor: Some(anchor.into()),
        }
    }

    fn reference(&self) -> Option<&Reference> {
        match self {
            Self::Text(_) => None,
            Self::Ref { reference, .. } => Some(reference),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Reference> for AttrValue {
    fn from(reference: Reference) -> Self {
        Self::Ref {
            reference,
            anchor: None,
        }
    }
}

impl Fragment {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    pub fn reference(r: impl Into<Reference>) -> Self {
        Self::Ref(r.into())
    }

    /// Empty content.
    pub const fn empty() -> Self {
        Self::Mixed(Vec::new())
    }

    /// Collect every reference embedded in this tree.
    ///
    /// Walks with an explicit stack, so deep trees do not recurse.
    pub fn references(&self) -> FxHashSet<Reference> {
        let mut refs = FxHashSet::default();
        let mut stack = vec![self];

        while let Some(item) = stack.pop() {
            match item {
                Self::Text(_) | Self::Raw(_) => {}
                Self::Mixed(parts) => stack.extend(parts),
                Self::Element(element) => {
                    refs.extend(element.attrs.iter().filter_map(|(_, v)| v.reference()).cloned());
                    stack.push(&element.content);
                }
                Self::Ref(reference) => {
                    refs.insert(reference.clone());
                }
            }
        }

        refs
    }
}

/// Dismantles nested content with an explicit stack; the derived drop
/// would recurse once per nesting level.
impl Drop for Fragment {
    fn drop(&mut self) {
        let mut stack = match self {
            Self::Mixed(parts) => std::mem::take(parts),
            Self::Element(element) => vec![std::mem::replace(&mut element.content, Self::empty())],
            Self::Text(_) | Self::Raw(_) | Self::Ref(_) => return,
        };

        while let Some(mut item) = stack.pop() {
            match &mut item {
                Self::Mixed(parts) => stack.append(parts),
                Self::Element(element) => {
                    stack.push(std::mem::replace(&mut element.content, Self::empty()));
                }
                Self::Text(_) | Self::Raw(_) | Self::Ref(_) => {}
            }
            // `item` now owns no children
        }
    }
}

/// Build an element fragment.
///
/// # Example
/// ```ignore
/// let target = AttrValue::from(Reference::new("docs/b.md"));
/// let link = h("a", [("href", target)], Fragment::text("next"));
/// ```
pub fn h<'a, A>(tag: &str, attrs: A, content: Fragment) -> Fragment
where
    A: IntoIterator<Item = (&'a str, AttrValue)>,
{
    Fragment::Element(Box::new(Element {
        tag: tag.to_string(),
        attrs: attrs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        content,
    }))
}

/// Build an element fragment without attributes.
pub fn el(tag: &str, content: Fragment) -> Fragment {
    h(tag, std::iter::empty::<(&str, AttrValue)>(), content)
}
