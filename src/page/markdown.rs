//! Markdown to fragment conversion using pulldown-cmark.
//!
//! Local link and image destinations become [`Reference`]s, resolved
//! against the identifier of the document being converted:
//!
//! ```text
//! document: docs/guide/intro.md
//! [next](setup.md#install)   -> Ref(docs/guide/setup.md) + "#install"
//! ![](../img/logo.png)       -> Ref(docs/img/logo.png)
//! [web](https://example.com) -> literal href
//! ```

use percent_encoding::percent_decode_str;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::link::Reference;

use super::{AttrValue, Element, Fragment};

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// Result of converting one markdown document.
#[derive(Debug, Clone)]
pub struct MarkdownPage {
    /// Text of the first `# heading`, if any
    pub title: Option<String>,
    pub body: Fragment,
}

/// Open element on the converter stack.
///
/// An empty tag marks a transparent group (HTML blocks): its children are
/// spliced into the parent.
struct Frame {
    tag: &'static str,
    attrs: Vec<(String, AttrValue)>,
    children: Vec<Fragment>,
}

impl Frame {
    fn new(tag: &'static str, attrs: Vec<(String, AttrValue)>) -> Self {
        Self {
            tag,
            attrs,
            children: Vec::new(),
        }
    }
}

/// Markdown to fragment converter
struct MarkdownConverter<'a> {
    /// Identifier of the document (base for relative links)
    base: &'a str,
    /// Stack of open elements (for nested structures)
    stack: Vec<Frame>,
    /// Root children (collected when stack is empty)
    root_children: Vec<Fragment>,
    in_table_head: bool,
    /// Collects first-h1 text while inside it
    title_buf: Option<String>,
    title: Option<String>,
}

impl<'a> MarkdownConverter<'a> {
    fn new(base: &'a str) -> Self {
        Self {
            base,
            stack: Vec::new(),
            root_children: Vec::new(),
            in_table_head: false,
            title_buf: None,
            title: None,
        }
    }

    fn convert(mut self, markdown: &str, options: &MarkdownOptions) -> MarkdownPage {
        let parser = Parser::new_ext(markdown, options.to_pulldown_options());

        for event in parser {
            self.handle_event(event);
        }

        // Close anything left open by malformed input
        while !self.stack.is_empty() {
            self.close_frame();
        }

        MarkdownPage {
            title: self.title,
            body: Fragment::Mixed(self.root_children),
        }
    }

    /// Handle a single pulldown-cmark event
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(text.as_ref()),
            Event::Code(code) => self.add_inline_code(code.as_ref()),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.add_node(Fragment::raw(html.as_ref()));
            }
            Event::SoftBreak => self.add_text("\n"),
            Event::HardBreak => self.add_node(element("br", vec![], Fragment::empty())),
            Event::Rule => self.add_node(element("hr", vec![], Fragment::empty())),
            Event::FootnoteReference(name) => self.add_footnote_ref(name.as_ref()),
            Event::TaskListMarker(checked) => self.add_task_marker(checked),
            Event::InlineMath(math) => self.add_math(math.as_ref(), false),
            Event::DisplayMath(math) => self.add_math(math.as_ref(), true),
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.open("p", vec![]),
            Tag::Heading { level, id, .. } => {
                if level == HeadingLevel::H1 && self.title.is_none() {
                    self.title_buf = Some(String::new());
                }
                let attrs = id
                    .map(|id| vec![attr("id", id.to_string())])
                    .unwrap_or_default();
                self.open(heading_tag(level), attrs);
            }
            Tag::BlockQuote(_) => self.open("blockquote", vec![]),
            Tag::CodeBlock(kind) => {
                let attrs = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        vec![attr("class", format!("language-{lang}"))]
                    }
                    _ => vec![],
                };
                self.open("pre", vec![]);
                self.open("code", attrs);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => self.open("", vec![]),
            Tag::List(Some(start)) => {
                let attrs = if start != 1 {
                    vec![attr("start", start.to_string())]
                } else {
                    vec![]
                };
                self.open("ol", attrs);
            }
            Tag::List(None) => self.open("ul", vec![]),
            Tag::Item => self.open("li", vec![]),
            Tag::FootnoteDefinition(name) => self.open(
                "div",
                vec![attr("class", "footnote".into()), attr("id", format!("fn-{name}"))],
            ),
            Tag::Table(_) => self.open("table", vec![]),
            Tag::TableHead => {
                self.in_table_head = true;
                self.open("thead", vec![]);
                self.open("tr", vec![]);
            }
            Tag::TableRow => self.open("tr", vec![]),
            Tag::TableCell => self.open(if self.in_table_head { "th" } else { "td" }, vec![]),
            Tag::Emphasis => self.open("em", vec![]),
            Tag::Strong => self.open("strong", vec![]),
            Tag::Strikethrough => self.open("del", vec![]),
            Tag::Superscript => self.open("sup", vec![]),
            Tag::Subscript => self.open("sub", vec![]),
            Tag::Link { dest_url, title, .. } => {
                let mut attrs = vec![("href".to_string(), link_value(self.base, &dest_url))];
                if !title.is_empty() {
                    attrs.push(attr("title", title.to_string()));
                }
                self.open("a", attrs);
            }
            Tag::Image { dest_url, title, .. } => {
                let mut attrs = vec![("src".to_string(), link_value(self.base, &dest_url))];
                if !title.is_empty() {
                    attrs.push(attr("title", title.to_string()));
                }
                // alt text arrives as children, folded into an attribute on close
                self.open("img", attrs);
            }
            Tag::DefinitionList => self.open("dl", vec![]),
            Tag::DefinitionListTitle => self.open("dt", vec![]),
            Tag::DefinitionListDefinition => self.open("dd", vec![]),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                self.close_frame();
                self.close_frame();
            }
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.close_frame();
                self.close_frame();
            }
            TagEnd::Heading(_) => {
                // An empty `#` leaves the title open for the next h1
                if let Some(title) = self.title_buf.take()
                    && !title.trim().is_empty()
                {
                    self.title = Some(title.trim().to_string());
                }
                self.close_frame();
            }
            _ => self.close_frame(),
        }
    }

    fn open(&mut self, tag: &'static str, attrs: Vec<(String, AttrValue)>) {
        self.stack.push(Frame::new(tag, attrs));
    }

    /// Pop the top frame and attach it to its parent.
    fn close_frame(&mut self) {
        let Some(mut frame) = self.stack.pop() else {
            return;
        };

        if frame.tag.is_empty() {
            self.add_node(Fragment::Mixed(frame.children));
            return;
        }

        if frame.tag == "img" {
            let alt = plain_text(&frame.children);
            frame.attrs.push(attr("alt", alt));
            frame.children.clear();
        }

        self.add_node(element(frame.tag, frame.attrs, Fragment::Mixed(frame.children)));
    }

    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(buf) = self.title_buf.as_mut() {
            buf.push_str(text);
        }
        self.add_node(Fragment::text(text));
    }

    fn add_inline_code(&mut self, code: &str) {
        if let Some(buf) = self.title_buf.as_mut() {
            buf.push_str(code);
        }
        self.add_node(element("code", vec![], Fragment::text(code)));
    }

    fn add_footnote_ref(&mut self, name: &str) {
        let link = element(
            "a",
            vec![attr("href", format!("#fn-{name}")), attr("id", format!("fnref-{name}"))],
            Fragment::text(format!("[{name}]")),
        );
        self.add_node(element("sup", vec![attr("class", "footnote-ref".into())], link));
    }

    fn add_task_marker(&mut self, checked: bool) {
        let mut attrs = vec![attr("type", "checkbox".into()), attr("disabled", String::new())];
        if checked {
            attrs.push(attr("checked", String::new()));
        }
        self.add_node(element("input", attrs, Fragment::empty()));
    }

    fn add_math(&mut self, formula: &str, display: bool) {
        let (tag, class) = if display {
            ("div", "math display")
        } else {
            ("span", "math inline")
        };
        self.add_node(element(tag, vec![attr("class", class.into())], Fragment::text(formula)));
    }

    /// Add a node to current context (top of stack or root)
    fn add_node(&mut self, node: Fragment) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        } else {
            self.root_children.push(node);
        }
    }
}

fn element(tag: &str, attrs: Vec<(String, AttrValue)>, content: Fragment) -> Fragment {
    Fragment::Element(Box::new(Element {
        tag: tag.to_string(),
        attrs,
        content,
    }))
}

fn attr(key: &str, value: String) -> (String, AttrValue) {
    (key.to_string(), AttrValue::Text(value))
}

const fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Concatenate the text leaves of `parts`.
fn plain_text(parts: &[Fragment]) -> String {
    let mut out = String::new();
    let mut stack: Vec<&Fragment> = parts.iter().rev().collect();
    while let Some(part) = stack.pop() {
        match part {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Mixed(children) => stack.extend(children.iter().rev()),
            Fragment::Element(element) => stack.push(&element.content),
            Fragment::Raw(_) | Fragment::Ref(_) => {}
        }
    }
    out
}

/// Classify a link destination: local targets become references, anything
/// else (schemes, `#anchors`, site-absolute `/paths`) stays literal.
pub fn link_value(base: &str, dest: &str) -> AttrValue {
    if dest.is_empty() || dest.starts_with('#') || dest.starts_with('/') || has_scheme(dest) {
        return AttrValue::Text(dest.to_string());
    }

    let (path, anchor) = match dest.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (dest, None),
    };
    let path = percent_decode_str(path)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string());
    let reference = Reference::from(join_reference(base, &path));

    match anchor {
        Some(anchor) => AttrValue::anchored(reference, anchor),
        None => AttrValue::from(reference),
    }
}

/// `scheme:` per RFC 3986 (letter, then letters/digits/`+`/`-`/`.`).
fn has_scheme(dest: &str) -> bool {
    let Some((scheme, _)) = dest.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve `path` against the directory of the identifier `base`.
///
/// `..` never climbs above the identifier root.
fn join_reference(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = match base.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Convert a markdown document identified by `base`.
pub fn from_markdown(base: &str, markdown: &str, options: &MarkdownOptions) -> MarkdownPage {
    MarkdownConverter::new(base).convert(markdown, options)
}
