//! Document shell: wraps a rendered body into a complete HTML page.
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="en">
//!   <head> charset, title, stylesheet (Ref) </head>
//!   <body>
//!     <header> title block + nav (Refs) </header>
//!     <div class="main-content"> body </div>
//!     <footer> permalink (Ref as text) </footer>
//!   </body>
//! </html>
//! ```

use crate::link::Reference;

use super::{AttrValue, Fragment, el, h};

/// One entry of the site navigation.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub title: String,
    pub target: Reference,
}

/// Page-level inputs shared by every document of a build.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    /// Stylesheet reference linked from every page
    pub style: Option<Reference>,
    pub nav: Vec<NavItem>,
}

impl Shell {
    /// Wrap `body` into a full page for the document `current`.
    pub fn page(&self, current: &Reference, title: &str, body: Fragment) -> Fragment {
        let mut head = vec![
            h("meta", [("charset", AttrValue::from("utf-8"))], Fragment::empty()),
            el("title", Fragment::text(title)),
        ];
        if let Some(style) = &self.style {
            head.push(h(
                "link",
                [
                    ("rel", AttrValue::from("stylesheet")),
                    ("href", AttrValue::from(style.clone())),
                    ("type", AttrValue::from("text/css")),
                ],
                Fragment::empty(),
            ));
        }

        let mut header = vec![h(
            "div",
            [("class", AttrValue::from("title-block"))],
            h("h1", [("class", AttrValue::from("title"))], Fragment::text(title)),
        )];
        if !self.nav.is_empty() {
            header.push(self.nav(current));
        }

        Fragment::Mixed(vec![
            Fragment::raw("<!DOCTYPE html>"),
            h(
                "html",
                [("lang", AttrValue::from("en"))],
                Fragment::Mixed(vec![
                    el("head", Fragment::Mixed(head)),
                    el(
                        "body",
                        Fragment::Mixed(vec![
                            el("header", Fragment::Mixed(header)),
                            h("div", [("class", AttrValue::from("main-content"))], body),
                            Self::footer(current),
                        ]),
                    ),
                ]),
            ),
        ])
    }

    /// Permalink of the page itself, spelled out as link text.
    fn footer(current: &Reference) -> Fragment {
        h(
            "footer",
            [("class", AttrValue::from("permalink"))],
            h(
                "a",
                [("href", AttrValue::from(current.clone()))],
                Fragment::reference(current.clone()),
            ),
        )
    }

    fn nav(&self, current: &Reference) -> Fragment {
        let items = self
            .nav
            .iter()
            .map(|item| {
                let class = if &item.target == current {
                    "nav-row current"
                } else {
                    "nav-row"
                };
                el(
                    "li",
                    h(
                        "a",
                        [
                            ("class", AttrValue::from(class)),
                            ("href", AttrValue::from(item.target.clone())),
                        ],
                        Fragment::text(item.title.as_str()),
                    ),
                )
            })
            .collect();
        el("nav", el("ul", Fragment::Mixed(items)))
    }
}
