use chrono::{DateTime, Utc};
use std::convert::Infallible;

use super::walk;
use crate::core::{unmark, Node, Tree, ROOT_NAME};

/// One display line of a flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Branch identity, including the current-branch marker
    pub branch: String,
    /// Formatted line with connectors and optional age
    pub text: String,
}

impl Item {
    /// Real branch name to check out, or `None` for the synthetic root
    pub fn checkout_target(&self) -> Option<&str> {
        if self.branch == ROOT_NAME {
            None
        } else {
            Some(unmark(&self.branch))
        }
    }
}

/// Flatten a tree into display order, using the current time for ages
pub fn flatten(tree: &Tree) -> Vec<Item> {
    flatten_at(tree, Utc::now())
}

/// Flatten a tree with relative ages measured from `now`.
///
/// Lines match [`super::Printer`] output one for one.
pub fn flatten_at(tree: &Tree, now: DateTime<Utc>) -> Vec<Item> {
    let mut items = Vec::with_capacity(tree.branch_count());
    let result: Result<(), Infallible> = walk(tree, now, &mut |node: &Node, text: String| {
        items.push(Item {
            branch: node.name.clone(),
            text,
        });
        Ok(())
    });
    match result {
        Ok(()) => items,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Builder, Relations};
    use crate::render::render_to_string;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_flatten() {
        let relations: Relations = [("master", "feature1"), ("master", "feature2")]
            .into_iter()
            .collect();
        let last_commits = HashMap::from([("master".to_string(), now() - Duration::hours(2))]);
        let tree = Builder::new(relations)
            .with_last_commits(last_commits)
            .build(None)
            .unwrap();

        let items = flatten_at(&tree, now());

        assert_eq!(
            items,
            vec![
                Item {
                    branch: "master".to_string(),
                    text: "master (2h ago)".to_string()
                },
                Item {
                    branch: "feature1".to_string(),
                    text: "├── feature1".to_string()
                },
                Item {
                    branch: "feature2".to_string(),
                    text: "└── feature2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_matches_printer_output() {
        let relations: Relations = [
            ("main", "develop"),
            ("main", "feature"),
            ("main", "hotfix"),
            ("develop", "feature"),
            ("develop", "topic"),
            ("main", "topic"),
        ]
        .into_iter()
        .chain([("legacy", "legacy-fix")])
        .collect();
        let last_commits = HashMap::from([
            ("develop".to_string(), now() - Duration::days(40)),
            ("legacy".to_string(), now() - Duration::days(900)),
        ]);
        let tree = Builder::new(relations)
            .with_last_commits(last_commits)
            .build(Some("topic"))
            .unwrap();

        let joined: String = flatten_at(&tree, now())
            .into_iter()
            .map(|item| item.text + "\n")
            .collect();

        assert_eq!(joined, render_to_string(&tree, now()));
    }

    #[test]
    fn test_empty_tree() {
        assert!(flatten(&Tree::new()).is_empty());
    }

    #[test]
    fn test_root_never_appears() {
        let mut relations = Relations::new();
        relations.insert_branch("main");
        let tree = Builder::new(relations).build(None).unwrap();

        let items = flatten(&tree);
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|item| item.branch != ROOT_NAME));
    }

    #[test]
    fn test_checkout_target() {
        let marked = Item {
            branch: "develop*".to_string(),
            text: "└── develop*".to_string(),
        };
        let root = Item {
            branch: ROOT_NAME.to_string(),
            text: ROOT_NAME.to_string(),
        };

        assert_eq!(marked.checkout_target(), Some("develop"));
        assert_eq!(root.checkout_target(), None);
    }
}
