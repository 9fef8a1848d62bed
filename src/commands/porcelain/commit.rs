use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, TIMESTAMP_FORMAT};
use crate::error::RepoError;
use std::io::Write;

impl Repository {
    pub fn commit(&mut self, message: &str, author: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepoError::EmptyIndex.into());
        }

        let head = self.refs().read_head()?;
        let parent_oid = self.refs().resolve_head()?;
        let head_snapshot = self.head_snapshot()?;

        let snapshot = index.effective_tree(&head_snapshot);
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let commit = Commit::new(
            message.trim().to_string(),
            author.to_string(),
            timestamp,
            parent_oid.into_iter().collect(),
            snapshot,
        );

        let commit_oid = self.database().store(&commit)?;
        self.refs().advance_head(&commit_oid)?;

        index.clear();
        index.write_updates()?;
        drop(index);

        match head {
            Head::Symbolic(branch) | Head::Unborn(branch) => writeln!(
                self.writer(),
                "[{} {}] {}",
                branch,
                commit_oid.to_short_oid(),
                commit.message()
            )?,
            Head::Detached(_) => writeln!(
                self.writer(),
                "[HEAD detached at {}] {}",
                commit_oid.to_short_oid(),
                commit.message()
            )?,
        }
        writeln!(self.writer(), "{} files committed.", commit.snapshot().len())?;

        Ok(())
    }
}
