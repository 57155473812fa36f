//! Virtual HTML nodes.
//!
//! Every page and table is built as a tree of [`Node`]s and serialized in one
//! place, so text and attribute values are always escaped. [`Node::Raw`] is
//! reserved for trusted, pre-rendered report fragments.

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup inserted verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

/// Start building an element.
#[must_use]
pub const fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// A text node.
pub fn text(value: impl Into<String>) -> Node {
    Node::Text(value.into())
}

impl Element {
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn attr_if(self, condition: bool, name: &'static str, value: impl Into<String>) -> Self {
        if condition { self.attr(name, value) } else { self }
    }

    /// Boolean attribute such as `hidden` or `selected`.
    #[must_use]
    pub fn flag(self, condition: bool, name: &'static str) -> Self {
        self.attr_if(condition, name, "")
    }

    #[must_use]
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    #[must_use]
    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Node {
    /// Serialize to HTML.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Concatenated text of this node and its descendants, like `textContent`.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Raw(_) => String::new(),
            Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Text(value) => out.push_str(&escape(value)),
            Self::Raw(markup) => out.push_str(markup),
            Self::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for (name, value) in &element.attrs {
                    if value.is_empty() && is_boolean_attr(name) {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape(value));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_to(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

fn is_boolean_attr(name: &str) -> bool {
    matches!(
        name,
        "hidden" | "selected" | "multiple" | "required" | "disabled" | "checked" | "download"
    )
}

/// Escape a value for use in HTML text or a double-quoted attribute.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn text_and_attributes_are_escaped() {
        let node: Node = el("a")
            .attr("href", "x\"onmouseover=\"alert(1)")
            .text("<script>alert('x')</script>")
            .into();
        assert_eq!(
            node.render(),
            "<a href=\"x&quot;onmouseover=&quot;alert(1)\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = el("input").attr("type", "search").flag(true, "required").into();
        assert_eq!(node.render(), "<input type=\"search\" required>");
    }

    #[test]
    fn raw_nodes_are_inserted_verbatim() {
        let node: Node = el("section").child(Node::Raw("<h2>Summary</h2>".into())).into();
        assert_eq!(node.render(), "<section><h2>Summary</h2></section>");
        assert_eq!(node.text_content(), "");
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let node: Node = el("tr")
            .child(el("td").text("A"))
            .child(el("td").child(el("a").text("Report")))
            .into();
        assert_eq!(node.text_content(), "AReport");
    }
}
