//! Markup navigation over parsed console pages.
//!
//! A [`Document`] keeps both the parsed tree (for selector and traversal
//! based strategies) and the newline-stripped source (for raw-text
//! strategies). Helpers here mirror the DOM operations the strategies need:
//! ancestor climbing, `closest`, sibling walks, and text content.

use scraper::{ElementRef, Html, Selector};

use crate::error::FetchError;

// ============================================================================
// Document
// ============================================================================

/// A parsed console page.
pub struct Document {
    raw: String,
    html: Html,
}

impl Document {
    /// Parses a page. Newlines are stripped before parsing.
    pub fn parse(source: &str) -> Self {
        let raw = source.replace(['\r', '\n'], "");
        let html = Html::parse_document(&raw);
        Self { raw, html }
    }

    /// Returns the newline-stripped page source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Returns the first element matching `selector`, in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Iterates over all elements matching `selector`, in document order.
    pub fn select_all<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.raw.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// Compiles a CSS selector.
pub fn compile(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|e| FetchError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

// ============================================================================
// Traversal
// ============================================================================

/// Returns the full text content of an element and its descendants.
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Returns the parent element, if the parent is an element.
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Climbs `levels` parent elements.
pub fn ancestor(element: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    let mut current = element;
    for _ in 0..levels {
        current = parent_element(current)?;
    }
    Some(current)
}

/// Returns the element itself or its nearest ancestor matching `selector`.
pub fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let mut current = Some(element);
    while let Some(el) = current {
        if selector.matches(&el) {
            return Some(el);
        }
        current = parent_element(el);
    }
    None
}

/// Iterates over the element siblings that follow `element`.
pub fn next_element_siblings(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

/// Returns the value of the first text node under the `index`-th child
/// node (text nodes included) of `element`.
pub fn child_first_text(element: ElementRef<'_>, index: usize) -> Option<String> {
    let child = element.children().nth(index)?;
    let first = child.first_child()?;
    first.value().as_text().map(|t| t.to_string())
}

/// Returns true if the element has the given class.
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Returns true if the element is a `<table>`.
pub fn is_table(element: ElementRef<'_>) -> bool {
    element.value().name().eq_ignore_ascii_case("table")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><body>\n",
        r#"<div class="dataField"><div class="dataName"><span id="anchor">Label</span></div>"#,
        r#"<div class="dataValue">42 V</div></div>"#,
        "\n<p>after</p></body></html>"
    );

    #[test]
    fn test_parse_strips_newlines() {
        let doc = Document::parse(PAGE);
        assert!(!doc.raw().contains('\n'));
    }

    #[test]
    fn test_ancestor_and_child_text() {
        let doc = Document::parse(PAGE);
        let anchor_sel = compile("#anchor").unwrap();
        let anchor = doc.select_first(&anchor_sel).unwrap();

        let field = ancestor(anchor, 2).unwrap();
        assert!(has_class(field, "dataField"));
        assert_eq!(child_first_text(field, 1).as_deref(), Some("42 V"));
    }

    #[test]
    fn test_closest() {
        let doc = Document::parse(PAGE);
        let anchor = doc.select_first(&compile("#anchor").unwrap()).unwrap();
        let field = closest(anchor, &compile(".dataField").unwrap()).unwrap();
        assert_eq!(text_content(field), "Label42 V");
        assert!(closest(anchor, &compile("table").unwrap()).is_none());
    }

    #[test]
    fn test_next_element_siblings() {
        let doc = Document::parse(PAGE);
        let field = doc.select_first(&compile(".dataField").unwrap()).unwrap();
        let names: Vec<&str> = next_element_siblings(field).map(|e| e.value().name()).collect();
        assert_eq!(names, vec!["p"]);
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(compile("##"), Err(FetchError::InvalidSelector { .. })));
    }
}
