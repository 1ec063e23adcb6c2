// src/core/html.rs
// Thin wrapper over a parsed page. Extractors query it with CSS selectors
// (tag + class signature) and read text through `text_of`.

use scraper::{ElementRef, Html, Selector, html::Select};

use crate::config::consts::BUSY_MARKER;
use super::sanitize::normalize_ws;

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self { html: Html::parse_document(body) }
    }

    /// Whitespace-collapsed text of the first `<h2>`.
    pub fn heading(&self) -> Option<String> {
        self.html.select(sel!("h2")).next().map(text_of)
    }

    /// The origin answers with a plain page titled [`BUSY_MARKER`] instead of an error status.
    pub fn is_busy(&self) -> bool {
        self.heading().as_deref() == Some(BUSY_MARKER)
    }

    /// Short description of the page for logs and diagnostics.
    pub fn diagnostic(&self) -> String {
        self.heading()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| s!("page has no heading"))
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }
}

/// All descendant text of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}
