//! Repository abstraction and coordination
//!
//! The `Repository` type is the facade every command goes through. It wires
//! the lower-level areas together (database, index, workspace, refs) and
//! owns the output writer; the command implementations live in
//! `commands::porcelain` as `impl Repository` blocks.
//!
//! All paths are threaded from here: the core has no process-wide state.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::{Commit, Snapshot};
use crate::error::RepoError;
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Metadata directory name
pub const VCS_DIR: &str = ".minigit";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Ignore file created at init, excluded from tracking along with `VCS_DIR`
pub const IGNORE_FILE: &str = ".gitignore";

/// Repository handle over one working directory
pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout in production, a buffer in tests)
    writer: RefCell<Box<dyn Write>>,
    /// Staging area
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl Repository {
    pub fn new(path: PathBuf, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(VCS_DIR).join(INDEX_FILE).into_boxed_path());
        let database = Database::new(path.join(VCS_DIR).join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(VCS_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn vcs_path(&self) -> PathBuf {
        self.path.join(VCS_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.vcs_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepoError::NotARepository(VCS_DIR.to_string()).into())
        }
    }

    /// The commit HEAD resolves to, `None` on an unborn branch
    pub fn head_commit(&self) -> anyhow::Result<Option<Commit>> {
        match self.refs.resolve_head()? {
            Some(oid) => {
                let commit = self
                    .database
                    .parse_commit(&oid)?
                    .ok_or_else(|| RepoError::Corruption(oid.to_string()))?;
                Ok(Some(commit))
            }
            None => Ok(None),
        }
    }

    /// HEAD's snapshot, empty on an unborn branch
    pub fn head_snapshot(&self) -> anyhow::Result<Snapshot> {
        Ok(self
            .head_commit()?
            .map(Commit::into_snapshot)
            .unwrap_or_default())
    }
}
