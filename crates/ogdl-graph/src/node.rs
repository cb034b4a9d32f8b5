//! Graph nodes: the read-only view consumed by evaluators and dispatchers
//!
//! A node is a name plus an ordered list of children. Call expressions,
//! configuration blocks and unreduced arguments are all plain nodes.

use std::fmt;

/// Read-only access to a node of an ordered graph.
///
/// Consumers never mutate nodes through this trait; anything that needs to
/// keep a node beyond one call takes an owned copy with [`Graph::from_node`].
pub trait GraphNode {
    /// Node name
    fn name(&self) -> &str;

    /// Number of direct children
    fn len(&self) -> usize;

    /// Child at `index`, or `None` when out of range
    fn child(&self, index: usize) -> Option<&dyn GraphNode>;

    /// True when the node has no children
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over direct children in order
    fn children(&self) -> Children<'_>
    where
        Self: Sized,
    {
        Children {
            node: self,
            index: 0,
        }
    }
}

/// Iterator over the children of a [`GraphNode`].
pub struct Children<'a> {
    node: &'a dyn GraphNode,
    index: usize,
}

impl<'a> Children<'a> {
    /// Iterate over the children of a trait object
    pub fn of(node: &'a dyn GraphNode) -> Self {
        Self { node, index: 0 }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a dyn GraphNode;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.node.child(self.index)?;
        self.index += 1;
        Some(child)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.node.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Owned graph node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    name: String,
    children: Vec<Graph>,
}

impl Graph {
    /// Create a node without children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Alias of [`Graph::new`] that reads better when building argument lists
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// Builder-style: append a child and return self
    pub fn with_child(mut self, child: Graph) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style: append one leaf child per name
    pub fn with_leaves<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(names.into_iter().map(Graph::new));
        self
    }

    /// Append a child, returning a mutable reference to it
    pub fn add(&mut self, child: Graph) -> &mut Graph {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Deep copy of any node implementation
    pub fn from_node(node: &dyn GraphNode) -> Self {
        Self {
            name: node.name().to_string(),
            children: Children::of(node).map(Graph::from_node).collect(),
        }
    }

    /// Owned children
    pub fn nodes(&self) -> &[Graph] {
        &self.children
    }

    /// First direct child with the given name
    pub fn get(&self, name: &str) -> Option<&Graph> {
        self.children.iter().find(|c| c.name == name)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.name, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl GraphNode for Graph {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&dyn GraphNode> {
        self.children.get(index).map(|c| c as &dyn GraphNode)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
