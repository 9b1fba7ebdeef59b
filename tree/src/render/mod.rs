pub mod age;
pub mod printer;
pub mod flatten;

pub use age::relative_age;
pub use printer::{render_to_string, Printer};
pub use flatten::{flatten, flatten_at, Item};

use chrono::{DateTime, Utc};

use crate::core::{Node, NodeId, Tree};

/// Connector segments drawn in front of nested branches
pub mod chars {
    pub const BRANCH: &str = "├── ";
    pub const LAST_BRANCH: &str = "└── ";
    pub const PIPE: &str = "│   ";
    pub const BLANK: &str = "    ";
}

/// Branch name plus its relative age, when the tip time is known
pub fn display_name(node: &Node, now: DateTime<Utc>) -> String {
    match node.last_commit {
        Some(then) => format!("{} ({} ago)", node.name, relative_age(then, now)),
        None => node.name.clone(),
    }
}

/// Depth-first traversal shared by every presentation of a [`Tree`].
///
/// `emit` receives each node together with its fully formatted line. The
/// synthetic root produces no line; its children are emitted without any
/// connector and their descendants carry the accumulated prefix.
pub(crate) fn walk<E>(
    tree: &Tree,
    now: DateTime<Utc>,
    emit: &mut impl FnMut(&Node, String) -> Result<(), E>,
) -> Result<(), E> {
    for &top in &tree.root().children {
        let node = tree.node(top);
        emit(node, display_name(node, now))?;
        walk_children(tree, top, "", now, emit)?;
    }
    Ok(())
}

fn walk_children<E>(
    tree: &Tree,
    parent: NodeId,
    prefix: &str,
    now: DateTime<Utc>,
    emit: &mut impl FnMut(&Node, String) -> Result<(), E>,
) -> Result<(), E> {
    let children = &tree.node(parent).children;

    for (i, &child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let node = tree.node(child);
        let connector = if is_last { chars::LAST_BRANCH } else { chars::BRANCH };
        emit(node, format!("{prefix}{connector}{}", display_name(node, now)))?;

        let padding = if is_last { chars::BLANK } else { chars::PIPE };
        walk_children(tree, child, &format!("{prefix}{padding}"), now, emit)?;
    }

    Ok(())
}
