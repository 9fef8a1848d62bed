use crate::areas::database::CommitCache;
use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::ancestry::LcaFinder;
use crate::artifacts::merge::resolution::{conflict_markers, resolve_three_way};
use crate::artifacts::objects::commit::{Commit, Snapshot, TIMESTAMP_FORMAT};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepoError;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn merge(&mut self, target: &str, author: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let current_branch = match self.refs().read_head()? {
            Head::Symbolic(branch) => branch,
            Head::Unborn(branch) => {
                return Err(RepoError::UnbornBranch(branch.to_string()).into());
            }
            Head::Detached(_) => anyhow::bail!("cannot merge with a detached HEAD"),
        };

        let mut index = self.index();
        index.rehydrate()?;

        let head_snapshot = self.head_snapshot()?;
        if index.has_unstaged_changes(self.workspace(), &head_snapshot)? {
            return Err(RepoError::DirtyWorkingTree.into());
        }

        let other_branch = BranchName::try_parse(target.to_string())?;
        let head_oid = self
            .refs()
            .read_branch(&current_branch)?
            .ok_or_else(|| RepoError::UnbornBranch(current_branch.to_string()))?;
        let other_oid = self
            .refs()
            .read_branch(&other_branch)?
            .ok_or_else(|| RepoError::NotFound(format!("branch '{}'", other_branch)))?;

        let commit_cache = CommitCache::new();
        let database = self.database();
        let finder = LcaFinder::new(|oid| commit_cache.slim_commit(database, oid));

        // the other tip brings nothing new
        if finder.is_ancestor(&other_oid, &head_oid) {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(());
        }

        // HEAD brings nothing of its own: advance the branch, no new commit
        if finder.is_ancestor(&head_oid, &other_oid) {
            let other_commit = self.load_commit(&other_oid)?;

            self.refs().write_branch(&current_branch, &other_oid)?;
            self.workspace()
                .replace_tree(other_commit.snapshot(), self.database())?;
            index.clear();
            index.write_updates()?;

            writeln!(
                self.writer(),
                "Fast-forward: updated branch '{}' to {}.",
                current_branch,
                other_oid.to_short_oid()
            )?;
            return Ok(());
        }

        let base_oid = finder
            .find_lowest_common_ancestor(&head_oid, &other_oid)
            .ok_or_else(|| {
                anyhow::anyhow!("no common ancestor between HEAD and '{}'", other_branch)
            })?;

        eprintln!(
            "Merging {} into {}",
            other_oid.to_short_oid(),
            head_oid.to_short_oid()
        );

        let base_commit = self.load_commit(&base_oid)?;
        let head_commit = self.load_commit(&head_oid)?;
        let other_commit = self.load_commit(&other_oid)?;

        let merged = resolve_three_way(
            base_commit.snapshot(),
            head_commit.snapshot(),
            other_commit.snapshot(),
        );

        if merged.has_conflicts() {
            // leave the index and refs alone; the working tree carries the
            // marker content at each conflicted path
            for path in &merged.conflicts {
                let current_content =
                    self.blob_content_at(head_commit.snapshot(), path)?;
                let other_content =
                    self.blob_content_at(other_commit.snapshot(), path)?;

                self.workspace().write_file(
                    path,
                    &conflict_markers(
                        &current_content,
                        &other_content,
                        other_branch.as_ref(),
                    ),
                )?;

                eprintln!("CONFLICT (content): Merge conflict in {}", path.display());
            }

            return Err(RepoError::MergeConflict(merged.conflicts).into());
        }

        let message = format!("Merge branch '{}' into {}", other_branch, current_branch);
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let merge_commit = Commit::new(
            message,
            author.to_string(),
            timestamp,
            vec![head_oid, other_oid],
            merged.snapshot,
        );

        let merge_oid = self.database().store(&merge_commit)?;
        self.refs().write_branch(&current_branch, &merge_oid)?;
        self.workspace()
            .replace_tree(merge_commit.snapshot(), self.database())?;

        index.clear();
        for (path, blob_oid) in merge_commit.snapshot() {
            index.stage(path.clone(), blob_oid.clone());
        }
        index.write_updates()?;

        writeln!(
            self.writer(),
            "Merge complete. Created merge commit {}.",
            merge_oid.to_short_oid()
        )?;

        Ok(())
    }

    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.database()
            .parse_commit(oid)?
            .ok_or_else(|| RepoError::Corruption(oid.to_string()).into())
    }

    /// A path's contents in a snapshot; absent paths read as empty, which
    /// becomes an empty conflict-marker section
    fn blob_content_at(&self, snapshot: &Snapshot, path: &Path) -> anyhow::Result<String> {
        match snapshot.get(path) {
            Some(blob_oid) => {
                let blob = self
                    .database()
                    .parse_blob(blob_oid)?
                    .ok_or_else(|| RepoError::Corruption(blob_oid.to_string()))?;
                Ok(blob.content().to_string())
            }
            None => Ok(String::new()),
        }
    }
}
