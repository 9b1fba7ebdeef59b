use anyhow::Result;
use tracing::trace;
use tree::Relations;

use crate::repository::Branch;

/// Pairwise "is an ancestor of" test between branch tips
pub trait AncestorTest {
    /// Whether the tip of `ancestor` is a (possibly indirect) ancestor of the tip of `descendant`
    fn is_ancestor(&self, ancestor: &Branch, descendant: &Branch) -> Result<bool>;
}

/// Build the closed ancestor relation between `branches`.
///
/// Every unordered pair is tested in both directions. Branches pointing at the
/// same commit are left unrelated, which keeps the relation acyclic.
pub fn collect_relations<T: AncestorTest + ?Sized>(branches: &[Branch], oracle: &T) -> Result<Relations> {
    let mut relations = Relations::new();
    for branch in branches {
        relations.insert_branch(branch.name.as_str());
    }

    for (i, first) in branches.iter().enumerate() {
        for second in &branches[i + 1..] {
            if first.oid == second.oid {
                trace!(first = %first.name, second = %second.name, "same tip, skipping");
                continue;
            }
            if oracle.is_ancestor(first, second)? {
                relations.insert_edge(first.name.as_str(), second.name.as_str());
            }
            if oracle.is_ancestor(second, first)? {
                relations.insert_edge(second.name.as_str(), first.name.as_str());
            }
        }
    }

    Ok(relations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use git2::Oid;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashSet;

    struct FakeHistory {
        ancestry: HashSet<(&'static str, &'static str)>,
        calls: Cell<usize>,
    }

    impl AncestorTest for FakeHistory {
        fn is_ancestor(&self, ancestor: &Branch, descendant: &Branch) -> Result<bool> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .ancestry
                .contains(&(ancestor.name.as_str(), descendant.name.as_str())))
        }
    }

    fn branch(name: &str, tip: u8) -> Branch {
        Branch {
            name: name.to_string(),
            oid: Oid::from_bytes(&[tip; 20]).unwrap(),
            last_commit: Utc::now(),
        }
    }

    #[test]
    fn test_collects_both_directions() {
        let branches = vec![branch("feature", 2), branch("master", 1), branch("topic", 3)];
        let history = FakeHistory {
            ancestry: HashSet::from([
                ("master", "feature"),
                ("master", "topic"),
                ("feature", "topic"),
            ]),
            calls: Cell::new(0),
        };

        let relations = collect_relations(&branches, &history).unwrap();

        assert_eq!(
            relations.edges().collect::<Vec<_>>(),
            vec![("feature", "topic"), ("master", "feature"), ("master", "topic")]
        );
        assert_eq!(history.calls.get(), 6);
    }

    #[test]
    fn test_same_tip_is_not_tested() {
        let branches = vec![branch("main", 1), branch("alias", 1)];
        let history = FakeHistory {
            ancestry: HashSet::from([("main", "alias"), ("alias", "main")]),
            calls: Cell::new(0),
        };

        let relations = collect_relations(&branches, &history).unwrap();

        assert_eq!(relations.len(), 2);
        assert_eq!(relations.edge_count(), 0);
        assert_eq!(history.calls.get(), 0);
    }

    #[test]
    fn test_oracle_errors_propagate() {
        struct Broken;
        impl AncestorTest for Broken {
            fn is_ancestor(&self, _: &Branch, _: &Branch) -> Result<bool> {
                anyhow::bail!("object database unavailable")
            }
        }

        let branches = vec![branch("a", 1), branch("b", 2)];
        let err = collect_relations(&branches, &Broken).unwrap_err();
        assert!(err.to_string().contains("object database"));
    }
}
