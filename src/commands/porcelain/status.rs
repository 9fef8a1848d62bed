use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::status::report::Inspector;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        match self.refs().read_head()? {
            Head::Symbolic(branch) | Head::Unborn(branch) => {
                writeln!(self.writer(), "On branch {}", branch)?;
            }
            Head::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?;
            }
        }

        let report = Inspector::new(self).collect(&index)?;
        drop(index);

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !report.index_changes.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (path, change) in &report.index_changes {
                writeln!(
                    self.writer(),
                    "{}",
                    format!("\t{} {}", change, path.display()).green()
                )?;
            }
        }

        if !report.workspace_changes.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (path, change) in &report.workspace_changes {
                writeln!(
                    self.writer(),
                    "{}",
                    format!("\t{} {}", change, path.display()).red()
                )?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(
                    self.writer(),
                    "{}",
                    format!("\t{}", path.display()).red()
                )?;
            }
        }

        Ok(())
    }
}
