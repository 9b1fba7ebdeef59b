//! Repository access for gittree: local branches, HEAD, ancestry and checkout.

pub mod ancestry;
pub mod repository;

pub use ancestry::{collect_relations, AncestorTest};
pub use repository::{Branch, RepoError, Repository, Snapshot};
