//! References (branches and HEAD)
//!
//! Branches are plain files under `.minigit/refs/heads/<name>` containing a
//! commit digest. `HEAD` is a single file holding one of two forms:
//!
//! - `ref: refs/heads/<name>` — symbolic, tracking a branch
//! - a raw commit digest — detached
//!
//! A symbolic HEAD whose branch file is missing or empty is *unborn*: the
//! branch exists by name but has no commits yet (the state right after
//! `init`).
//!
//! Ref files are written under an exclusive file lock.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Regex pattern for parsing the symbolic HEAD form
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// The branch `init` points HEAD at
pub const DEFAULT_BRANCH: &str = "master";

/// The two HEAD forms plus the unborn-branch state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD tracks a branch; commits advance that branch
    Symbolic(BranchName),
    /// HEAD points directly at a commit; commits advance HEAD alone
    Detached(ObjectId),
    /// HEAD tracks a branch that has no commits yet
    Unborn(BranchName),
}

/// Reference manager rooted at the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.minigit`)
    path: Box<Path>,
}

impl Refs {
    /// Read HEAD and classify its form
    pub fn read_head(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            let branch = BranchName::try_parse(symref_match[1].to_string())?;

            match self.read_branch(&branch)? {
                Some(_) => Ok(Head::Symbolic(branch)),
                None => Ok(Head::Unborn(branch)),
            }
        } else {
            Ok(Head::Detached(ObjectId::try_parse(content.to_string())?))
        }
    }

    /// Resolve HEAD to the commit it points at, `None` when unborn
    pub fn resolve_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.read_head()? {
            Head::Symbolic(branch) => self.read_branch(&branch),
            Head::Detached(oid) => Ok(Some(oid)),
            Head::Unborn(_) => Ok(None),
        }
    }

    pub fn write_head_symbolic(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), format!("ref: refs/heads/{}", branch))
    }

    pub fn write_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), oid.to_string())
    }

    /// Advance whatever HEAD designates: the tracked branch when symbolic
    /// or unborn, HEAD itself when detached
    pub fn advance_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.read_head()? {
            Head::Symbolic(branch) | Head::Unborn(branch) => self.write_branch(&branch, oid),
            Head::Detached(_) => self.write_head_detached(oid),
        }
    }

    /// Read a branch ref, `None` when the branch file is missing or empty
    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name.as_ref());

        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;
        let content = content.trim();

        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(content.to_string())?))
        }
    }

    pub fn write_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.heads_path().join(name.as_ref()), oid.to_string())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.heads_path().join(name.as_ref()).exists()
    }

    /// Delete a branch ref; the active branch cannot be deleted
    ///
    /// # Returns
    ///
    /// The commit the deleted branch pointed at
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if let Head::Symbolic(current) | Head::Unborn(current) = self.read_head()?
            && &current == name
        {
            anyhow::bail!("cannot delete branch '{}' while on it", name);
        }

        let oid = self
            .read_branch(name)?
            .ok_or_else(|| anyhow::anyhow!("branch '{}' does not exist", name))?;

        let branch_path = self.heads_path().join(name.as_ref());
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;

        Ok(oid)
    }

    /// Enumerate branch refs sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<(BranchName, ObjectId)>> {
        let heads_path = self.heads_path();
        if !heads_path.exists() {
            return Ok(vec![]);
        }

        let mut branches = Vec::new();
        for entry in std::fs::read_dir(&heads_path)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }

            let name = BranchName::try_parse(entry.file_name().to_string_lossy().to_string())?;
            if let Some(oid) = self.read_branch(&name)? {
                branches.push((name, oid));
            }
        }

        branches.sort();
        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn oid(seed: char) -> ObjectId {
        ObjectId::try_parse(seed.to_string().repeat(40)).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().join(".minigit").into_boxed_path());
        refs.write_head_symbolic(&branch(DEFAULT_BRANCH)).unwrap();
        (dir, refs)
    }

    #[test]
    fn fresh_head_is_unborn() {
        let (_dir, refs) = refs();

        assert_eq!(refs.read_head().unwrap(), Head::Unborn(branch("master")));
        assert_eq!(refs.resolve_head().unwrap(), None);
    }

    #[test]
    fn head_becomes_symbolic_once_the_branch_has_a_commit() {
        let (_dir, refs) = refs();

        refs.advance_head(&oid('a')).unwrap();

        assert_eq!(refs.read_head().unwrap(), Head::Symbolic(branch("master")));
        assert_eq!(refs.resolve_head().unwrap(), Some(oid('a')));
    }

    #[test]
    fn detached_head_resolves_to_its_own_digest() {
        let (_dir, refs) = refs();

        refs.write_head_detached(&oid('b')).unwrap();

        assert_eq!(refs.read_head().unwrap(), Head::Detached(oid('b')));
        assert_eq!(refs.resolve_head().unwrap(), Some(oid('b')));
    }

    #[test]
    fn advancing_a_detached_head_moves_head_alone() {
        let (_dir, refs) = refs();

        refs.write_branch(&branch("master"), &oid('a')).unwrap();
        refs.write_head_detached(&oid('a')).unwrap();
        refs.advance_head(&oid('b')).unwrap();

        assert_eq!(refs.read_head().unwrap(), Head::Detached(oid('b')));
        assert_eq!(refs.read_branch(&branch("master")).unwrap(), Some(oid('a')));
    }

    #[test]
    fn branches_are_listed_sorted_by_name() {
        let (_dir, refs) = refs();

        refs.write_branch(&branch("zeta"), &oid('a')).unwrap();
        refs.write_branch(&branch("alpha"), &oid('b')).unwrap();

        let branches = refs.list_branches().unwrap();
        assert_eq!(
            branches,
            vec![(branch("alpha"), oid('b')), (branch("zeta"), oid('a'))]
        );
    }

    #[test]
    fn deleting_the_active_branch_is_refused() {
        let (_dir, refs) = refs();

        refs.advance_head(&oid('a')).unwrap();

        assert!(refs.delete_branch(&branch("master")).is_err());
    }

    #[test]
    fn deleting_another_branch_returns_its_commit() {
        let (_dir, refs) = refs();

        refs.advance_head(&oid('a')).unwrap();
        refs.write_branch(&branch("feature"), &oid('b')).unwrap();

        assert_eq!(refs.delete_branch(&branch("feature")).unwrap(), oid('b'));
        assert!(!refs.branch_exists(&branch("feature")));
    }
}
