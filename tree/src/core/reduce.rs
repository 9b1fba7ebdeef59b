use tracing::trace;

use super::relation::Relations;

/// Strip every edge implied by another path, leaving the covering edges.
///
/// For each parent and each ordered pair of distinct children `(first, second)`,
/// the edge `parent -> second` is dropped when `second` is reachable from `first`.
/// Reachability is always answered from the untouched input, never from the
/// partially reduced copy, so the outcome does not depend on the order in which
/// parents or pairs are visited. Parents and children are nevertheless visited
/// in lexicographic order.
///
/// Edges between mutually reachable branches are never dropped: they belong
/// to a cycle, which the hierarchy builder must still see in order to report it.
pub fn reduce(relations: &Relations) -> Relations {
    let mut reduced = relations.clone();

    for (parent, children) in relations.iter() {
        for first in children {
            for second in children {
                if first == second || !relations.reaches(first, second) {
                    continue;
                }
                if relations.reaches(second, first) || relations.reaches(second, parent) {
                    trace!(%parent, %first, %second, "kept edge on a cycle");
                    continue;
                }
                if reduced.remove_edge(parent, second) {
                    trace!(%parent, %first, %second, "dropped implied edge");
                }
            }
        }
    }

    reduced
}
