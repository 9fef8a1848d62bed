use crate::areas::repository::Repository;
use crate::error::RepoError;
use colored::Colorize;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Walk history from HEAD along first parents
    ///
    /// Stops at the root commit, or on revisiting a digest in case a
    /// corrupted store produced a cycle.
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut current = self.refs().resolve_head()?;
        if current.is_none() {
            writeln!(self.writer(), "No commits yet.")?;
            return Ok(());
        }

        let mut visited = HashSet::new();
        while let Some(oid) = current {
            if !visited.insert(oid.clone()) {
                break;
            }

            let commit = self
                .database()
                .parse_commit(&oid)?
                .ok_or_else(|| RepoError::Corruption(oid.to_string()))?;

            writeln!(self.writer(), "{}", format!("commit {}", oid).yellow())?;
            writeln!(self.writer(), "Author: {}", commit.author())?;
            writeln!(self.writer(), "Date:   {}", commit.timestamp())?;
            writeln!(self.writer())?;
            writeln!(self.writer(), "    {}", commit.message())?;

            if !commit.parents().is_empty() {
                let parents = commit
                    .parents()
                    .iter()
                    .map(|parent| parent.to_short_oid())
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(self.writer(), "Parents: {}", parents)?;
            }
            writeln!(self.writer())?;

            current = commit.parent().cloned();
        }

        Ok(())
    }
}
