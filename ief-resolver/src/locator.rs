//! Namespace-agnostic element lookup over `roxmltree` trees.
//!
//! Policy files declare the IEF default namespace, but nothing here depends on
//! it: elements are matched on their local name only. Lookups search strict
//! descendants of the node they are called on, in document order.

use roxmltree::Node;

/// First descendant element of `node` whose local name is `tag`.
pub fn find_first<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    // descendants() yields the node itself first
    node.descendants().skip(1).find(|n| matches_tag(n, tag))
}

/// All descendant elements of `node` whose local name is `tag`, in document order.
pub fn find_all<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(|n| matches_tag(n, tag))
        .collect()
}

fn matches_tag(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Lookup capability the resolvers need from a document node.
pub trait ElementExt<'a, 'input: 'a> {
    /// See [`find_first`].
    fn find_first(&self, tag: &str) -> Option<Node<'a, 'input>>;

    /// See [`find_all`].
    fn find_all(&self, tag: &str) -> Vec<Node<'a, 'input>>;

    /// Attribute value, treating an empty value as absent.
    fn attr(&self, name: &str) -> Option<&'a str>;

    /// First non-empty value among `names`.
    fn attr_any(&self, names: &[&str]) -> Option<&'a str>;

    /// Concatenated descendant text, trimmed. Whitespace-only text is absent.
    fn text_content(&self) -> Option<String>;

    /// Text content of the first `tag` descendant.
    fn child_text(&self, tag: &str) -> Option<String>;
}

impl<'a, 'input: 'a> ElementExt<'a, 'input> for Node<'a, 'input> {
    fn find_first(&self, tag: &str) -> Option<Node<'a, 'input>> {
        find_first(*self, tag)
    }

    fn find_all(&self, tag: &str) -> Vec<Node<'a, 'input>> {
        find_all(*self, tag)
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attribute(name).filter(|v| !v.is_empty())
    }

    fn attr_any(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| self.attr(name))
    }

    fn text_content(&self) -> Option<String> {
        let text: String = self
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn child_text(&self, tag: &str) -> Option<String> {
        find_first(*self, tag).and_then(|n| n.text_content())
    }
}
