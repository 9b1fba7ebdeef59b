pub mod relation;
pub mod reduce;
pub mod marker;
pub mod node;
pub mod builder;

pub use relation::Relations;
pub use reduce::reduce;
pub use marker::{mark_current, unmark, Marked, CURRENT_MARKER};
pub use node::{Node, NodeId, Tree, ROOT_NAME};
pub use builder::{assemble, Builder, TreeError};
