use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Ancestor relation between branches: each branch maps to the set of
/// branches whose tips descend from its tip.
///
/// Ordered containers keep every traversal over the relation deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl Relations {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Register a branch with no descendants (no-op if already present)
    pub fn insert_branch(&mut self, name: impl Into<String>) {
        self.edges.entry(name.into()).or_default();
    }

    /// Record that `ancestor` precedes `descendant`; both become branches
    pub fn insert_edge(&mut self, ancestor: impl Into<String>, descendant: impl Into<String>) {
        let descendant = descendant.into();
        self.insert_branch(descendant.clone());
        self.edges.entry(ancestor.into()).or_default().insert(descendant);
    }

    /// Remove a single edge, returning whether it was present
    pub fn remove_edge(&mut self, ancestor: &str, descendant: &str) -> bool {
        self.edges
            .get_mut(ancestor)
            .map(|children| children.remove(descendant))
            .unwrap_or(false)
    }

    pub fn contains_branch(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn contains_edge(&self, ancestor: &str, descendant: &str) -> bool {
        self.edges
            .get(ancestor)
            .is_some_and(|children| children.contains(descendant))
    }

    /// Direct descendants recorded for `name`
    pub fn children(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    /// All branches in lexicographic order
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// All `(ancestor, descendant)` pairs in lexicographic order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.edges.iter().map(|(name, children)| (name.as_str(), children))
    }

    /// Number of branches
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Breadth-first reachability from `from` to `to` following at least one edge.
    ///
    /// Visited branches are never expanded twice, so the search terminates on
    /// cyclic input as well.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            let Some(children) = self.edges.get(current) else {
                continue;
            };
            for next in children {
                if next == to {
                    return true;
                }
                if visited.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }

        false
    }

    pub(crate) fn insert_children(&mut self, name: String, children: BTreeSet<String>) {
        self.edges.insert(name, children);
    }
}

impl From<BTreeMap<String, BTreeSet<String>>> for Relations {
    fn from(edges: BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut relations = Self { edges };
        // Descendants that were never listed as keys still count as branches
        let missing: Vec<String> = relations
            .edges
            .values()
            .flatten()
            .filter(|child| !relations.edges.contains_key(*child))
            .cloned()
            .collect();
        for name in missing {
            relations.insert_branch(name);
        }
        relations
    }
}

impl From<HashMap<String, HashSet<String>>> for Relations {
    fn from(edges: HashMap<String, HashSet<String>>) -> Self {
        edges
            .into_iter()
            .map(|(name, children)| (name, children.into_iter().collect()))
            .collect::<BTreeMap<String, BTreeSet<String>>>()
            .into()
    }
}

impl<A: Into<String>, D: Into<String>> FromIterator<(A, D)> for Relations {
    fn from_iter<I: IntoIterator<Item = (A, D)>>(iter: I) -> Self {
        let mut relations = Self::new();
        for (ancestor, descendant) in iter {
            relations.insert_edge(ancestor, descendant);
        }
        relations
    }
}
