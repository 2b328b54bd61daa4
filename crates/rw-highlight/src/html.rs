//! HTML serialization of the markup tree.

use crate::node::{AttributeValue, Element, Node};

/// Escape special HTML characters in text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serialize a forest of roots, concatenated in order.
#[must_use]
pub fn render_html(roots: &[Element]) -> String {
    let mut out = String::new();
    for root in roots {
        write_element(root, &mut out);
    }
    out
}

impl Element {
    /// Serialize this element and its subtree.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        write_attribute(name, value, out);
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Element(child) => write_element(child, out),
            Node::Text(text) => out.push_str(&escape_html(text)),
        }
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn write_attribute(name: &str, value: &AttributeValue, out: &mut String) {
    let value = match value {
        AttributeValue::Flag(false) => return,
        AttributeValue::Flag(true) => {
            out.push(' ');
            out.push_str(name);
            return;
        }
        AttributeValue::List(values) if values.is_empty() => return,
        AttributeValue::List(values) => values.join(" "),
        AttributeValue::Text(value) => value.clone(),
    };
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(&value));
    out.push('"');
}
