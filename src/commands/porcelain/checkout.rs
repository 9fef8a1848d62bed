use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepoError;

const DETACHMENT_NOTICE: &str = "You are in 'detached HEAD' state. You can look around and make \
experimental commits; create a branch to retain them.";

/// What a checkout target resolved to
enum CheckoutTarget {
    Branch(BranchName),
    Commit(ObjectId),
}

impl Repository {
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        let head_snapshot = self.head_snapshot()?;
        if index.has_unstaged_changes(self.workspace(), &head_snapshot)? {
            return Err(RepoError::DirtyWorkingTree.into());
        }

        // a branch name wins over a commit digest of the same spelling
        let (resolved, target_commit) = self.resolve_checkout_target(target)?;

        match &resolved {
            CheckoutTarget::Branch(branch) => self.refs().write_head_symbolic(branch)?,
            CheckoutTarget::Commit(oid) => self.refs().write_head_detached(oid)?,
        }

        self.workspace()
            .replace_tree(target_commit.snapshot(), self.database())?;

        index.clear();
        index.write_updates()?;

        match &resolved {
            CheckoutTarget::Branch(branch) => eprintln!("Switched to branch '{}'", branch),
            CheckoutTarget::Commit(oid) => {
                eprintln!("Note: switching to '{}'.", oid.to_short_oid());
                eprintln!("{}", DETACHMENT_NOTICE);
            }
        }

        Ok(())
    }

    fn resolve_checkout_target(
        &self,
        target: &str,
    ) -> anyhow::Result<(CheckoutTarget, Commit)> {
        if let Ok(branch) = BranchName::try_parse(target.to_string())
            && self.refs().branch_exists(&branch)
        {
            let oid = self
                .refs()
                .read_branch(&branch)?
                .ok_or_else(|| RepoError::UnbornBranch(branch.to_string()))?;
            let commit = self
                .database()
                .parse_commit(&oid)?
                .ok_or_else(|| RepoError::Corruption(oid.to_string()))?;

            return Ok((CheckoutTarget::Branch(branch), commit));
        }

        if let Ok(oid) = ObjectId::try_parse(target.to_string())
            && let Ok(Some(commit)) = self.database().parse_commit(&oid)
        {
            return Ok((CheckoutTarget::Commit(oid), commit));
        }

        Err(RepoError::NotFound(format!("reference '{}'", target)).into())
    }
}
