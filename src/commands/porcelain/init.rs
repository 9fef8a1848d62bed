use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::{IGNORE_FILE, Repository, VCS_DIR};
use crate::artifacts::branch::branch_name::BranchName;
use crate::error::RepoError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepoError::AlreadyInitialized(self.vcs_path()).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create the objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create the refs/heads directory")?;

        self.refs()
            .write_head_symbolic(&BranchName::try_parse(DEFAULT_BRANCH.to_string())?)?;

        let mut index = self.index();
        index.write_updates()?;
        drop(index);

        // seed an ignore file naming the metadata directory; never overwrite
        // one the user already has
        let ignore_path = self.path().join(IGNORE_FILE);
        if !ignore_path.exists() {
            fs::write(&ignore_path, format!("{}/\n", VCS_DIR))
                .context("Failed to write the ignore file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty minigit repository in {}",
            self.vcs_path().display()
        )?;

        Ok(())
    }
}
