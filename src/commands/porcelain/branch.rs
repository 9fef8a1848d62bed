use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::error::RepoError;
use std::io::Write;

impl Repository {
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let name = BranchName::try_parse(name.to_string())?;

        let head_oid = match self.refs().read_head()? {
            Head::Unborn(branch) => {
                return Err(RepoError::UnbornBranch(branch.to_string()).into());
            }
            _ => self
                .refs()
                .resolve_head()?
                .ok_or_else(|| anyhow::anyhow!("no current HEAD to branch from"))?,
        };

        if self.refs().branch_exists(&name) {
            anyhow::bail!("a branch named '{}' already exists", name);
        }

        self.refs().write_branch(&name, &head_oid)?;

        writeln!(
            self.writer(),
            "Branch '{}' created at {}",
            name,
            head_oid.to_short_oid()
        )?;

        Ok(())
    }
}
