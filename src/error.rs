//! Repository error kinds
//!
//! Expected failure conditions are modeled as a discriminated enum so that
//! callers can tell user errors apart from corruption and I/O trouble.
//! Commands carry these inside `anyhow` chains; underlying filesystem errors
//! stay as `std::io::Error` with context attached at the call site.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a minigit repository (missing {0} directory)")]
    NotARepository(String),
    #[error("minigit repository already initialized in {}", .0.display())]
    AlreadyInitialized(PathBuf),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid branch name: '{0}'")]
    InvalidName(String),
    #[error("invalid path '{0}': tracked paths may not contain whitespace")]
    InvalidPath(String),
    #[error("nothing to commit, staging area is empty")]
    EmptyIndex,
    #[error("branch '{0}' has no commits yet")]
    UnbornBranch(String),
    #[error("your local changes would be overwritten; commit or discard them first")]
    DirtyWorkingTree,
    #[error("automatic merge failed; fix conflicts and then commit the result")]
    MergeConflict(Vec<PathBuf>),
    #[error("corrupt or missing object {0}")]
    Corruption(String),
}
