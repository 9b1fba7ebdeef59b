//! Branch tree construction and rendering.
//!
//! Turns a closed "precedes" relation between branches into a rooted forest:
//! the relation is reduced to its covering edges, the checked-out branch is
//! marked, and the result is assembled under a synthetic root. The forest can
//! then be printed as connector-drawn text or flattened into addressable lines.

pub mod core;
pub mod render;

pub use self::core::{
    assemble, mark_current, reduce, unmark, Builder, Marked, Node, NodeId, Relations, Tree,
    TreeError, CURRENT_MARKER, ROOT_NAME,
};
pub use self::render::{flatten, flatten_at, relative_age, render_to_string, Item, Printer};
