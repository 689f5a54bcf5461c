//! An arena-allocated parse tree.
//!
//! Both parsers materialize the same concrete structure: interior
//! nodes are labelled with grammar symbols and children are stored in
//! left-to-right source order, so a tree built by the predictive
//! parser and one built by the SLR parser for the same input differ
//! only in the intermediate nodes their grammars introduce. Nodes are
//! referred to by [`NodeId`] index into a [`ParseTree`] arena rather
//! than by owning pointers.

/// An index into a [`ParseTree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single parse tree node.
#[derive(Debug, Clone)]
struct Node {
    /// The grammar symbol this node stands for, or a terminal's lexeme.
    label: String,
    /// The children in left-to-right source order.
    children: Vec<NodeId>,
}

/// A concrete parse tree over an arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    /// The node arena; a [`NodeId`] indexes into this.
    nodes: Vec<Node>,
}

impl ParseTree {
    /// Constructs an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new node with the given label and no children.
    pub fn push(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: label.into(),
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` to `parent`'s children, after any existing ones.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// Returns the label of `node`.
    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node.0].label
    }

    /// Replaces the label of `node`.
    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) {
        self.nodes[node.0].label = label.into();
    }

    /// Returns the children of `node` in left-to-right source order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = ParseTree::new();
        let root = tree.push("Expression");
        let left = tree.push("Term");
        let op = tree.push("plus");
        let right = tree.push("Term");
        tree.add_child(root, left);
        tree.add_child(root, op);
        tree.add_child(root, right);

        let labels: Vec<&str> = tree
            .children(root)
            .iter()
            .map(|&child| tree.label(child))
            .collect();
        assert_eq!(labels, ["Term", "plus", "Term"]);
    }

    #[test]
    fn labels_can_be_rewritten() {
        let mut tree = ParseTree::new();
        let node = tree.push("identifier");
        tree.set_label(node, "total");
        assert_eq!(tree.label(node), "total");
        assert!(tree.children(node).is_empty());
    }
}
