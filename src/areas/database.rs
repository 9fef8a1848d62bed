//! Object store
//!
//! Persists blobs and commits in one flat content-addressed directory:
//! each object lives at `.minigit/objects/<digest>` as its raw serialized
//! bytes. Writes are idempotent (an existing object is never rewritten) and
//! go through a temp file plus rename so a crash cannot leave a partial
//! object under a valid digest.
//!
//! Reads of missing objects return `None`; callers decide policy. An object
//! that is present but does not parse as the expected kind is corruption.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepoError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Content-addressed object store
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.minigit/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object under its own digest
    ///
    /// A no-op when the object already exists; identical contents produce
    /// the identical file either way.
    ///
    /// # Returns
    ///
    /// The stored object's ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.as_ref());

        if !object_path.exists() {
            std::fs::create_dir_all(&self.path).context(format!(
                "Unable to create object directory {}",
                self.path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    /// Load raw object bytes, `None` when the object is absent
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Option<Bytes>> {
        let object_path = self.path.join(object_id.as_ref());

        if !object_path.exists() {
            return Ok(None);
        }

        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(Some(object_content.into()))
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.as_ref()).exists()
    }

    /// Parse an object as a blob
    ///
    /// # Returns
    ///
    /// `Some(Blob)` when present, `None` when the object is absent
    pub fn parse_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.load(object_id)? {
            Some(content) => Ok(Some(Blob::deserialize(Cursor::new(content))?)),
            None => Ok(None),
        }
    }

    /// Parse an object as a commit
    ///
    /// # Returns
    ///
    /// `Some(Commit)` when present and well-formed, `None` when the object
    /// is absent, `Corruption` when present but unparseable
    pub fn parse_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.load(object_id)? {
            Some(content) => {
                let commit = Commit::deserialize(Cursor::new(content))
                    .map_err(|_| RepoError::Corruption(object_id.to_string()))?;
                Ok(Some(commit))
            }
            None => Ok(None),
        }
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

/// Commit cache for graph traversal algorithms
///
/// Ancestry and LCA queries revisit the same commits many times; this cache
/// parses each commit once and hands out slim records after that. Interior
/// mutability lets a plain `Fn` closure serve as the commit loader.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl CommitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slim record for a commit, loading it on first access
    ///
    /// # Returns
    ///
    /// `None` when the object is absent or does not parse as a commit, so
    /// traversals degrade instead of crashing on a broken ref.
    pub fn slim_commit(&self, database: &Database, object_id: &ObjectId) -> Option<SlimCommit> {
        if let Some(cached) = self.commits.borrow().get(object_id) {
            return Some(cached.clone());
        }

        let commit = database.parse_commit(object_id).ok().flatten()?;
        let slim = SlimCommit {
            oid: object_id.clone(),
            parents: commit.parents().to_vec(),
            timestamp: commit.timestamp().to_string(),
        };

        self.commits
            .borrow_mut()
            .insert(object_id.clone(), slim.clone());

        Some(slim)
    }
}
