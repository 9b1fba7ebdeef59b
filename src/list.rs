use anyhow::{Context, Result};
use gittree_core::Repository;
use std::io::Write;
use std::path::Path;
use tree::{Builder, Printer};

/// Print the branch tree of the repository at `path` to `output`
pub fn run_list<W: Write>(path: &Path, show_age: bool, mut output: W) -> Result<()> {
    let repo = Repository::open(path).context("failed to open repository")?;
    let snapshot = repo.snapshot()?;

    if snapshot.is_empty() {
        writeln!(output, "No branches found")?;
        return Ok(());
    }

    let mut builder = Builder::new(snapshot.relations.clone());
    if show_age {
        builder = builder.with_last_commits(snapshot.last_commits());
    }
    let tree = builder
        .build(snapshot.current.as_deref())
        .context("failed to build tree")?;

    Printer::new(output).print(&tree)?;
    Ok(())
}
