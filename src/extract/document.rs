//! Typed views over a parsed HTML document.
//!
//! `Document` owns the parsed tree. `Container` and `Node` borrow from it and
//! expose only `Option`-returning queries, so call sites never have to guess
//! whether an attribute or descendant is present.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document. Parsing is lenient and never fails.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw markup into a document.
    pub fn parse(markup: &str) -> Self {
        Self { html: Html::parse_document(markup) }
    }

    /// Returns every element matching `selector`, in document order.
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<Container<'a>> {
        self.html.select(selector).map(Container::new).collect()
    }

    /// Returns every element whose tag is one of `tags`, in document order.
    pub fn elements_by_tag<'a>(&'a self, tags: &[String]) -> Vec<Container<'a>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| tags.iter().any(|t| t.eq_ignore_ascii_case(e.value().name())))
            .map(Container::new)
            .collect()
    }
}

/// One subtree believed to hold a single product listing.
#[derive(Clone, Copy)]
pub struct Container<'a> {
    element: ElementRef<'a>,
}

impl<'a> Container<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// The container element itself as a node.
    pub fn node(&self) -> Node<'a> {
        Node { element: self.element }
    }

    /// First descendant matching `selector`.
    pub fn first(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element.select(selector).next().map(|element| Node { element })
    }

    /// All descendants matching `selector`, in document order.
    pub fn all<'s>(&'s self, selector: &'s Selector) -> impl Iterator<Item = Node<'a>> + 's {
        self.element.select(selector).map(|element| Node { element })
    }

    /// Trimmed, whitespace-collapsed text of the whole container.
    pub fn text(&self) -> String {
        self.node().text()
    }

    /// Concatenated text nodes without any normalization.
    pub fn raw_text(&self) -> String {
        self.node().raw_text()
    }
}

/// An element inside a container.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    /// Lowercase tag name.
    pub fn tag(&self) -> &'a str {
        self.element.value().name()
    }

    /// Attribute value, if the attribute is present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Attribute value trimmed, or `None` when absent or blank.
    pub fn non_empty_attr(&self, name: &str) -> Option<String> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty()).map(String::from)
    }

    /// True if any class token contains `needle`, ignoring case.
    pub fn has_class_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.element.value().classes().any(|c| c.to_lowercase().contains(&needle))
    }

    /// Text content with runs of whitespace collapsed and ends trimmed.
    pub fn text(&self) -> String {
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Concatenated text nodes as they appear in the markup.
    pub fn raw_text(&self) -> String {
        self.element.text().collect()
    }
}
