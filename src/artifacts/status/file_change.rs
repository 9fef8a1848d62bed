//! Change kinds reported by `status`

/// Difference between the index and the HEAD snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexChange {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for IndexChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexChange::Added => write!(f, "new file:"),
            IndexChange::Modified => write!(f, "modified:"),
            IndexChange::Deleted => write!(f, "deleted:"),
        }
    }
}

/// Difference between the working tree and the index (or HEAD when a path
/// is not staged)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceChange {
    Modified,
    Deleted,
}

impl std::fmt::Display for WorkspaceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceChange::Modified => write!(f, "modified:"),
            WorkspaceChange::Deleted => write!(f, "deleted:"),
        }
    }
}
