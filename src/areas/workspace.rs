//! Working directory operations
//!
//! Everything that touches the user's tree lives here: listing tracked-able
//! files, reading them as blobs, and replacing the whole tree on checkout.
//! The metadata directory and the ignore file are hard-excluded from every
//! listing; the ignore file's contents are never interpreted.

use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Snapshot;
use crate::error::RepoError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".minigit", ".git", ".gitignore"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List every regular file in the working tree as a sorted relative
    /// path, excluding the metadata directory and the ignore file
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        if path.is_file() && !Self::is_ignored(relative) {
            Some(relative.to_path_buf())
        } else {
            None
        }
    }

    pub fn is_regular_file(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        let file_path = self.path.join(file_path);

        std::fs::read_to_string(&file_path)
            .with_context(|| format!("failed to read file {:?}", file_path))
    }

    /// Read a working-tree file as a blob
    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(data))
    }

    /// Write a file, creating parent directories as needed
    pub fn write_file(&self, file_path: &Path, content: &str) -> anyhow::Result<()> {
        let absolute_path = self.path.join(file_path);

        if let Some(parent) = absolute_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {:?}", parent))?;
        }

        std::fs::write(&absolute_path, content)
            .with_context(|| format!("failed to write file {:?}", absolute_path))
    }

    /// Replace the working tree with a snapshot
    ///
    /// Deletes every top-level entry except the metadata directory and the
    /// ignore file, then materializes each snapshot path from the object
    /// store.
    pub fn replace_tree(&self, snapshot: &Snapshot, database: &Database) -> anyhow::Result<()> {
        self.clear_top_level()?;

        for (path, blob_oid) in snapshot {
            let blob = database
                .parse_blob(blob_oid)?
                .ok_or_else(|| RepoError::Corruption(blob_oid.to_string()))?;

            self.write_file(path, blob.content())?;
        }

        Ok(())
    }

    fn clear_top_level(&self) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name();
            if IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()) {
                continue;
            }

            if entry.path().is_dir() {
                std::fs::remove_dir_all(entry.path())
                    .with_context(|| format!("failed to remove directory {:?}", entry.path()))?;
            } else {
                std::fs::remove_file(entry.path())
                    .with_context(|| format!("failed to remove file {:?}", entry.path()))?;
            }
        }

        Ok(())
    }
}
