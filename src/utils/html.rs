//! HTML utility functions.
//!
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `is_void_element()` - elements rendered without a closing tag

use std::borrow::Cow;

/// Characters that require escaping in text content.
const TEXT_ESCAPE_CHARS: [char; 3] = ['<', '>', '&'];

/// Characters that require escaping inside a double-quoted attribute.
const ATTR_ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Quotes are left alone. Uses `Cow` to avoid allocation when no escaping
/// is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_ESCAPE_CHARS)
}

/// Escape HTML attribute values (quotes included).
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Check if an HTML tag is a void element (no content, no closing tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}
