//! Staging area (index)
//!
//! The index buffers the next commit: a `staged` map of path -> blob ID for
//! additions and modifications, plus a `removed` set of paths to delete
//! relative to HEAD. Both persist to a single text file:
//!
//! ```text
//! staged <digest> <path>
//! removed <path>
//! ```
//!
//! ## Locking
//!
//! Reads take a shared lock on the index file, writes an exclusive one.
//! Repository access is still single-writer by contract; the locks only
//! keep an accidental concurrent invocation from tearing the file.

use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Staging area for the next commit
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.minigit/index`)
    path: Box<Path>,
    /// Staged additions and modifications: path -> blob ID
    staged: BTreeMap<PathBuf, ObjectId>,
    /// Paths marked for deletion relative to HEAD
    removed: BTreeSet<PathBuf>,
    /// Flag indicating unsaved modifications
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            staged: BTreeMap::new(),
            removed: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn staged(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<PathBuf> {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    /// Stage a path at the given blob ID, clearing any pending removal
    pub fn stage(&mut self, path: PathBuf, blob_oid: ObjectId) {
        self.removed.remove(&path);
        self.staged.insert(path, blob_oid);
        self.changed = true;
    }

    /// Mark a path for deletion, dropping any staged version
    pub fn mark_removed(&mut self, path: PathBuf) {
        self.staged.remove(&path);
        self.removed.insert(path);
        self.changed = true;
    }

    pub fn clear(&mut self) {
        self.staged.clear();
        self.removed.clear();
        self.changed = true;
    }

    /// Load the index from disk, replacing the in-memory state
    ///
    /// Creates an empty index file when none exists yet.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path.exists() {
            std::fs::File::create(&self.path)?;
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        self.staged.clear();
        self.removed.clear();
        self.changed = false;

        let content = std::io::read_to_string(lock.deref_mut())?;
        for line in content.lines() {
            let Some((kind, rest)) = line.split_once(' ') else {
                continue;
            };

            match kind {
                "staged" => {
                    if let Some((digest, path)) = rest.split_once(' ') {
                        self.staged.insert(
                            PathBuf::from(path),
                            ObjectId::try_parse(digest.to_string())?,
                        );
                    }
                }
                "removed" => {
                    self.removed.insert(PathBuf::from(rest));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Persist the current state, replacing the index file
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut content = String::new();
        for (path, blob_oid) in &self.staged {
            content.push_str(&format!("staged {} {}\n", blob_oid, path.display()));
        }
        for path in &self.removed {
            content.push_str(&format!("removed {}\n", path.display()));
        }

        lock.deref_mut().write_all(content.as_bytes())?;
        self.changed = false;

        Ok(())
    }

    /// The tree the next commit would record: HEAD's snapshot with staged
    /// entries overlaid and removed entries deleted
    pub fn effective_tree(&self, head_snapshot: &Snapshot) -> Snapshot {
        let mut tree = head_snapshot.clone();

        for (path, blob_oid) in &self.staged {
            tree.insert(path.clone(), blob_oid.clone());
        }
        for path in &self.removed {
            tree.remove(path);
        }

        tree
    }

    /// Check whether the working tree carries changes the index does not
    ///
    /// True when any of these hold, scoped to the working tree without the
    /// metadata directory and the ignore file:
    ///
    /// - a HEAD path is gone from the working tree and not marked removed
    /// - a HEAD path's working-tree digest differs from HEAD and is not
    ///   staged at exactly the working-tree digest
    /// - a working-tree path is untracked (in neither HEAD nor `staged`)
    pub fn has_unstaged_changes(
        &self,
        workspace: &Workspace,
        head_snapshot: &Snapshot,
    ) -> anyhow::Result<bool> {
        for (path, head_oid) in head_snapshot {
            if !workspace.is_regular_file(path) {
                if !self.removed.contains(path) {
                    return Ok(true);
                }
                continue;
            }

            let worktree_oid = workspace.parse_blob(path)?.object_id()?;
            if worktree_oid != *head_oid && self.staged.get(path) != Some(&worktree_oid) {
                return Ok(true);
            }
        }

        for path in workspace.list_files()? {
            if !head_snapshot.contains_key(&path) && !self.staged.contains_key(&path) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
