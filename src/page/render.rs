//! Fragment serialization to HTML.

use crate::link::{LinkError, Reference};
use crate::utils::html::{escape, escape_attr, is_void_element};

use super::{AttrValue, Fragment};

/// Serialize `fragment` to HTML, asking `resolve` for the location of each
/// embedded reference.
///
/// Walks with an explicit stack, so nesting depth is bounded by memory, not
/// by the thread's stack. Fails with the first error `resolve` returns.
pub fn render<F>(fragment: &Fragment, mut resolve: F) -> Result<String, LinkError>
where
    F: FnMut(&Reference) -> Result<String, LinkError>,
{
    let mut out = String::new();
    let mut stack = vec![Step::Open(fragment)];

    while let Some(step) = stack.pop() {
        let fragment = match step {
            Step::Open(fragment) => fragment,
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };

        match fragment {
            Fragment::Text(text) => out.push_str(&escape(text)),
            Fragment::Raw(raw) => out.push_str(raw),
            Fragment::Mixed(parts) => stack.extend(parts.iter().rev().map(Step::Open)),
            Fragment::Ref(reference) => out.push_str(&escape(&resolve(reference)?)),
            Fragment::Element(element) => {
                write_open_tag(&mut out, &element.tag, &element.attrs, &mut resolve)?;
                if !is_void_element(&element.tag) {
                    stack.push(Step::Close(&element.tag));
                    stack.push(Step::Open(&element.content));
                }
            }
        }
    }

    Ok(out)
}

/// Pending work of the render walk.
enum Step<'a> {
    Open(&'a Fragment),
    Close(&'a str),
}

fn write_open_tag<F>(
    out: &mut String,
    tag: &str,
    attrs: &[(String, AttrValue)],
    resolve: &mut F,
) -> Result<(), LinkError>
where
    F: FnMut(&Reference) -> Result<String, LinkError>,
{
    out.push('<');
    out.push_str(tag);
    for (key, value) in attrs {
        let value = match value {
            AttrValue::Text(text) => text.clone(),
            AttrValue::Ref { reference, anchor } => {
                let mut url = resolve(reference)?;
                if let Some(anchor) = anchor {
                    url.push('#');
                    url.push_str(anchor);
                }
                url
            }
        };
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(&value));
        out.push('"');
    }
    out.push('>');
    Ok(())
}
