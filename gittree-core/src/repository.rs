use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{build::CheckoutBuilder, BranchType, ErrorCode, ObjectType, Oid, Repository as Git2Repository};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use tree::Relations;

use crate::ancestry::{collect_relations, AncestorTest};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a git repository: {}", .0.display())]
    NotRepository(PathBuf),

    #[error("branch not found: {0}")]
    BranchNotFound(String),
}

/// A local branch and its tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Short name, without `refs/heads/`
    pub name: String,
    /// Tip commit
    pub oid: Oid,
    /// Committer time of the tip commit
    pub last_commit: DateTime<Utc>,
}

/// Branch state read once per invocation
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub branches: Vec<Branch>,
    /// Checked-out branch; `None` for a detached or unborn HEAD
    pub current: Option<String>,
    /// Closed ancestor relation between `branches`
    pub relations: Relations,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Tip commit times keyed by branch name
    pub fn last_commits(&self) -> HashMap<String, DateTime<Utc>> {
        self.branches
            .iter()
            .map(|branch| (branch.name.clone(), branch.last_commit))
            .collect()
    }
}

pub struct Repository {
    path: PathBuf,
    git_repo: Git2Repository,
}

impl Repository {
    /// Open an existing repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let git_repo = match Git2Repository::open(&path) {
            Ok(repo) => repo,
            Err(err) if err.code() == ErrorCode::NotFound => {
                return Err(RepoError::NotRepository(path).into());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to open repository at {}", path.display()));
            }
        };

        debug!(path = %path.display(), "opened repository");
        Ok(Repository { path, git_repo })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Local branches sorted by name
    pub fn branches(&self) -> Result<Vec<Branch>> {
        let mut branches = Vec::new();

        for entry in self.git_repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                warn!("skipping branch with a non UTF-8 name");
                continue;
            };
            let commit = branch
                .get()
                .peel_to_commit()
                .with_context(|| format!("Failed to resolve tip of {name}"))?;

            let last_commit = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .context("Invalid commit timestamp")?;

            branches.push(Branch {
                name,
                oid: commit.id(),
                last_commit,
            });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    /// Name of the checked-out branch, `None` when HEAD is detached or unborn
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.git_repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err).context("Failed to resolve HEAD"),
        }
    }

    /// Closed ancestor relation between `branches`
    pub fn relations(&self, branches: &[Branch]) -> Result<Relations> {
        collect_relations(branches, self).context("Failed to analyze branch relationships")
    }

    /// Read branches, HEAD and their relation in one go
    pub fn snapshot(&self) -> Result<Snapshot> {
        let branches = self.branches().context("Failed to get branches")?;
        let current = self.current_branch()?;
        let relations = self.relations(&branches)?;

        info!(
            branches = branches.len(),
            edges = relations.edge_count(),
            current = current.as_deref().unwrap_or("-"),
            "read branch snapshot"
        );
        Ok(Snapshot {
            branches,
            current,
            relations,
        })
    }

    /// Check out a local branch and point HEAD at it
    pub fn checkout(&self, name: &str) -> Result<()> {
        let branch = match self.git_repo.find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(err) if err.code() == ErrorCode::NotFound => {
                return Err(RepoError::BranchNotFound(name.to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };
        let reference = branch.get();
        let refname = reference
            .name()
            .context("Branch reference name is not valid UTF-8")?;
        let object = reference.peel(ObjectType::Commit)?;

        let mut options = CheckoutBuilder::new();
        options.safe();
        self.git_repo
            .checkout_tree(&object, Some(&mut options))
            .with_context(|| format!("Failed to check out {name}"))?;
        self.git_repo.set_head(refname)?;

        info!(branch = name, "checked out branch");
        Ok(())
    }
}

impl AncestorTest for Repository {
    fn is_ancestor(&self, ancestor: &Branch, descendant: &Branch) -> Result<bool> {
        if ancestor.oid == descendant.oid {
            return Ok(false);
        }
        self.git_repo
            .graph_descendant_of(descendant.oid, ancestor.oid)
            .with_context(|| format!("checking ancestry {}->{}", ancestor.name, descendant.name))
    }
}
