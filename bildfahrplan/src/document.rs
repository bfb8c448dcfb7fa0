//! Typesetting document around the diagram pages.

use askama::Template;

/// Complete LaTeX document holding one picture per page.
#[derive(Template)]
#[template(path = "document.tex", escape = "none")]
pub struct DiagramDocument<'a> {
    pub pages: &'a [String],
}

impl<'a> DiagramDocument<'a> {
    pub fn new(pages: &'a [String]) -> Self {
        Self { pages }
    }
}
