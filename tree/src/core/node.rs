use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Identity of the synthetic root collecting all parentless branches
pub const ROOT_NAME: &str = ".";

/// Index of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A branch in the forest
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Branch name, suffixed with the marker for the checked-out branch
    pub name: String,
    /// Direct descendants, in display order
    pub children: Vec<NodeId>,
    /// Time of the branch tip commit
    pub last_commit: Option<DateTime<Utc>>,
}

impl Node {
    pub fn new(name: impl Into<String>, last_commit: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            last_commit,
        }
    }

    pub fn add_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAME
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted forest of branches.
///
/// Nodes live in an arena and parents refer to children by [`NodeId`], so a
/// branch directly preceded by two unrelated branches is stored once and
/// listed under both parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Tree {
    /// A tree holding only the synthetic root
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(ROOT_NAME.to_string(), NodeId(0));
        Self {
            nodes: vec![Node::new(ROOT_NAME, None)],
            index,
        }
    }

    /// Insert a node, or return the existing one with the same name
    pub fn insert(&mut self, name: impl Into<String>, last_commit: Option<DateTime<Utc>>) -> NodeId {
        let name = name.into();
        if let Some(id) = self.index.get(&name) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(name.clone(), id);
        self.nodes.push(Node::new(name, last_commit));
        id
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].add_child(child);
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Every node id, root first
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| self.node(id))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.node(id).children.iter().map(|child| self.node(*child))
    }

    /// Branches without a parent, in display order
    pub fn top_level(&self) -> impl Iterator<Item = &Node> {
        self.children(self.root_id())
    }

    /// Number of branches, not counting the synthetic root
    pub fn branch_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.branch_count() == 0
    }

    /// All branch names in insertion order, root excluded
    pub fn branch_names(&self) -> impl Iterator<Item = &str> {
        self.nodes[1..].iter().map(|node| node.name.as_str())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_node() {
        let node = Node::new("test", None);

        assert_eq!(node.name, "test");
        assert!(node.children.is_empty());
        assert!(node.is_leaf());
        assert!(!node.is_root());
    }

    #[test]
    fn test_add_child_keeps_order() {
        let mut tree = Tree::new();
        let parent = tree.insert("parent", None);
        let first = tree.insert("child1", None);
        let second = tree.insert("child2", None);

        tree.add_child(parent, first);
        tree.add_child(parent, second);

        let names: Vec<_> = tree.children(parent).map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["child1", "child2"]);
    }

    #[test]
    fn test_insert_is_unique_by_name() {
        let mut tree = Tree::new();
        let a = tree.insert("shared", None);
        let b = tree.insert("shared", None);

        assert_eq!(a, b);
        assert_eq!(tree.branch_count(), 1);
    }

    #[test]
    fn test_empty_tree_has_only_root() {
        let tree = Tree::new();

        assert!(tree.is_empty());
        assert!(tree.root().is_root());
        assert_eq!(tree.top_level().count(), 0);
        assert_eq!(tree.get(ROOT_NAME).map(|n| n.name.as_str()), Some("."));
    }
}
