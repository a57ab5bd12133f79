//! Tree traversal over markup nodes.
//!
//! All walks are depth-first and pre-order with children in document order.
//! Traversal uses an explicit stack, so nesting depth is bounded only by
//! memory.

use super::markup::Attribute;

/// Kind of a markup node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic document root
    Document,
    /// Element with a tag name
    Element,
    /// Literal text
    Text,
}

/// The view of a markup node the walkers need.
pub trait TreeNode: Sized {
    /// Node kind.
    fn kind(&self) -> NodeKind;

    /// Tag name for elements, `None` otherwise.
    fn tag_name(&self) -> Option<&str>;

    /// Attributes in declaration order (empty for non-elements).
    fn attributes(&self) -> &[Attribute];

    /// Child nodes in document order.
    fn children(&self) -> &[Self];

    /// Literal content for text nodes, `None` otherwise.
    fn text(&self) -> Option<&str>;
}

/// Pre-order iterator over a subtree, including its root.
pub struct PreOrder<'a, N: TreeNode> {
    stack: Vec<&'a N>,
}

impl<'a, N: TreeNode> PreOrder<'a, N> {
    /// Start a walk at `root`.
    pub fn new(root: &'a N) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a, N: TreeNode> Iterator for PreOrder<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Find the namespace declared on the first `html` element.
///
/// Returns the value of the first attribute on that element whose name starts
/// with `xmlns`, or an empty string when there is no `html` element or it
/// declares no namespace. Later `html` elements are never consulted.
pub fn find_namespace<N: TreeNode>(root: &N) -> String {
    find_first_by_tag(root, "html")
        .and_then(|html| {
            html.attributes()
                .iter()
                .find(|attr| attr.name.starts_with("xmlns"))
        })
        .map(|attr| attr.value.clone())
        .unwrap_or_default()
}

/// Find the first element (pre-order) with the given tag name.
pub fn find_first_by_tag<'a, N: TreeNode>(root: &'a N, tag_name: &str) -> Option<&'a N> {
    PreOrder::new(root)
        .find(|node| node.kind() == NodeKind::Element && node.tag_name() == Some(tag_name))
}

/// Concatenate every text node under `root` with no separators.
pub fn extract_text<N: TreeNode>(root: &N) -> String {
    let mut text = String::new();
    for content in PreOrder::new(root).filter_map(TreeNode::text) {
        text.push_str(content);
    }
    text
}
