//! Status collection
//!
//! Builds the three sections of `status` by comparing, for every path, the
//! HEAD snapshot, the index, and the working tree:
//!
//! - index vs. HEAD: what the next commit would change
//! - working tree vs. index/HEAD: edits not yet staged
//! - untracked: in the working tree but in neither HEAD nor the index
//!
//! Working-tree digests are recomputed from file contents; the inspector
//! has no stat cache, which keeps detection exact at the cost of hashing.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChange, WorkspaceChange};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// Changes to be committed, against HEAD
    pub index_changes: BTreeMap<PathBuf, IndexChange>,
    /// Changes not staged for commit
    pub workspace_changes: BTreeMap<PathBuf, WorkspaceChange>,
    /// Files in neither HEAD nor the index
    pub untracked: BTreeSet<PathBuf>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.index_changes.is_empty()
            && self.workspace_changes.is_empty()
            && self.untracked.is_empty()
    }
}

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    pub fn collect(&self, index: &Index) -> anyhow::Result<StatusReport> {
        let head_snapshot = self.repository.head_snapshot()?;
        let workspace = self.repository.workspace();

        let mut worktree_digests = BTreeMap::new();
        for path in workspace.list_files()? {
            let blob_oid = workspace.parse_blob(&path)?.object_id()?;
            worktree_digests.insert(path, blob_oid);
        }

        let mut report = StatusReport::default();

        // changes to be committed: staged entries differing from HEAD,
        // plus everything marked removed
        for (path, staged_oid) in index.staged() {
            match head_snapshot.get(path) {
                None => {
                    report.index_changes.insert(path.clone(), IndexChange::Added);
                }
                Some(head_oid) if head_oid != staged_oid => {
                    report
                        .index_changes
                        .insert(path.clone(), IndexChange::Modified);
                }
                Some(_) => {}
            }
        }
        for path in index.removed() {
            report
                .index_changes
                .insert(path.clone(), IndexChange::Deleted);
        }

        // changes not staged for commit
        for (path, worktree_oid) in &worktree_digests {
            if let Some(staged_oid) = index.staged().get(path) {
                if staged_oid != worktree_oid {
                    report
                        .workspace_changes
                        .insert(path.clone(), WorkspaceChange::Modified);
                }
            } else if let Some(head_oid) = head_snapshot.get(path)
                && head_oid != worktree_oid
            {
                report
                    .workspace_changes
                    .insert(path.clone(), WorkspaceChange::Modified);
            }
        }
        for path in head_snapshot.keys() {
            if !worktree_digests.contains_key(path)
                && !index.staged().contains_key(path)
                && !index.removed().contains(path)
            {
                report
                    .workspace_changes
                    .insert(path.clone(), WorkspaceChange::Deleted);
            }
        }
        for path in index.staged().keys() {
            if !worktree_digests.contains_key(path) && !index.removed().contains(path) {
                report
                    .workspace_changes
                    .insert(path.clone(), WorkspaceChange::Deleted);
            }
        }

        // untracked: in the working tree only
        for path in worktree_digests.keys() {
            if !head_snapshot.contains_key(path) && !index.staged().contains_key(path) {
                report.untracked.insert(path.clone());
            }
        }

        Ok(report)
    }
}
