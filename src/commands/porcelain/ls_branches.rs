use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn ls_branches(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.refs().read_head()?;
        let branches = self.refs().list_branches()?;

        for (name, oid) in &branches {
            let is_active = matches!(&head, Head::Symbolic(active) if active == name);

            if is_active {
                writeln!(
                    self.writer(),
                    "{}",
                    format!("* {} ({})", name, oid.to_short_oid()).green()
                )?;
            } else {
                writeln!(self.writer(), "  {} ({})", name, oid.to_short_oid())?;
            }
        }

        if let Head::Detached(oid) = &head {
            writeln!(
                self.writer(),
                "* (HEAD detached at {})",
                oid.to_short_oid()
            )?;
        }

        Ok(())
    }
}
