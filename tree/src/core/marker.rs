use tracing::debug;

use super::relation::Relations;

/// Suffix appended to the checked-out branch
pub const CURRENT_MARKER: char = '*';

/// Result of marking the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub relations: Relations,
    /// Marked identity, `None` when no branch was marked
    pub current: Option<String>,
}

/// Rename `current` to its marked form, rewriting every edge that targets it.
///
/// An empty or unknown name leaves the relation unchanged. The input is never
/// modified.
pub fn mark_current(relations: &Relations, current: Option<&str>) -> Marked {
    let unchanged = || Marked {
        relations: relations.clone(),
        current: None,
    };

    let Some(current) = current.filter(|name| !name.is_empty()) else {
        return unchanged();
    };
    if !relations.contains_branch(current) {
        debug!(branch = current, "current branch not in relation; nothing marked");
        return unchanged();
    }

    let marked = format!("{current}{CURRENT_MARKER}");
    let mut rewritten = Relations::new();
    for (name, children) in relations.iter() {
        let name = if name == current { marked.clone() } else { name.to_string() };
        let children = children
            .iter()
            .map(|child| {
                if child == current {
                    marked.clone()
                } else {
                    child.clone()
                }
            })
            .collect();
        rewritten.insert_children(name, children);
    }

    Marked {
        relations: rewritten,
        current: Some(marked),
    }
}

/// Strip the current-branch marker, if present
pub fn unmark(name: &str) -> &str {
    name.strip_suffix(CURRENT_MARKER).unwrap_or(name)
}
