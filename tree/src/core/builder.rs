use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, VecDeque};
use thiserror::Error;
use tracing::debug;

use super::marker::{mark_current, Marked};
use super::node::{NodeId, Tree};
use super::reduce::reduce;
use super::relation::Relations;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("cyclic dependency detected between branches: {}", .branches.join(", "))]
    CyclicRelation { branches: Vec<String> },
}

/// Turns a closed ancestor relation into a [`Tree`]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    relations: Relations,
    last_commits: HashMap<String, DateTime<Utc>>,
}

impl Builder {
    pub fn new(relations: impl Into<Relations>) -> Self {
        Self {
            relations: relations.into(),
            last_commits: HashMap::new(),
        }
    }

    /// Attach tip commit times, keyed by unmarked branch name
    pub fn with_last_commits(mut self, last_commits: HashMap<String, DateTime<Utc>>) -> Self {
        self.last_commits = last_commits;
        self
    }

    /// Reduce, mark `current` and assemble the forest.
    ///
    /// The relation held by the builder is left untouched, so `build` can be
    /// called repeatedly (with or without a current branch).
    pub fn build(&self, current: Option<&str>) -> Result<Tree, TreeError> {
        let reduced = reduce(&self.relations);
        let Marked { relations, current: marked } = mark_current(&reduced, current);

        let tree = assemble(&relations, |name| {
            let key = match (&marked, current) {
                (Some(marked), Some(original)) if marked == name => original,
                _ => name,
            };
            self.last_commits.get(key).copied()
        })?;

        debug!(
            branches = tree.branch_count(),
            top_level = tree.top_level().count(),
            "built branch tree"
        );
        Ok(tree)
    }
}

/// Progress of a branch while the forest is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting on `pending` children that are not attached yet
    Active { pending: usize },
    /// Attached to all of its parents
    Resolved,
}

/// Assemble a reduced (and possibly marked) relation into a forest.
///
/// Branches are resolved leaves first: once every child of a branch is
/// resolved, the branch is attached under each of its parents. A branch that
/// never reaches zero pending children sits on a cycle.
pub fn assemble(
    relations: &Relations,
    last_commit: impl Fn(&str) -> Option<DateTime<Utc>>,
) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    let mut ids: HashMap<&str, NodeId> = HashMap::new();
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut states: BTreeMap<&str, State> = BTreeMap::new();

    for (name, children) in relations.iter() {
        ids.insert(name, tree.insert(name, last_commit(name)));
        states.insert(
            name,
            State::Active {
                pending: children.len(),
            },
        );
        for child in children {
            parents.entry(child.as_str()).or_default().push(name);
        }
    }

    for name in relations.branches() {
        if !parents.contains_key(name) {
            tree.add_child(tree.root_id(), ids[name]);
        }
    }

    let mut queue: VecDeque<&str> = states
        .iter()
        .filter(|(_, state)| **state == State::Active { pending: 0 })
        .map(|(name, _)| *name)
        .collect();
    let mut resolved = 0;

    while let Some(name) = queue.pop_front() {
        states.insert(name, State::Resolved);
        resolved += 1;

        for parent in parents.get(name).into_iter().flatten() {
            tree.add_child(ids[parent], ids[name]);
            if let Some(State::Active { pending }) = states.get_mut(parent) {
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(*parent);
                }
            }
        }
    }

    if resolved < states.len() {
        // Unresolved ancestors of a cycle are not part of it
        let branches: Vec<String> = states
            .iter()
            .filter(|(name, state)| **state != State::Resolved && relations.reaches(name, name))
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(TreeError::CyclicRelation { branches });
    }

    sort_children(&mut tree);
    Ok(tree)
}

fn sort_children(tree: &mut Tree) {
    let ids: Vec<NodeId> = tree.node_ids().collect();
    for id in ids {
        let mut children = tree.node(id).children.clone();
        children.sort_by(|a, b| tree.node(*a).name.cmp(&tree.node(*b).name));
        tree.node_mut(id).children = children;
    }
}
