use crate::areas::repository::Repository;
use crate::error::RepoError;
use std::path::Path;

impl Repository {
    /// Mark files for deletion in the next commit and drop them from the
    /// working tree
    pub fn rm(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        let head_snapshot = self.head_snapshot()?;

        for raw_path in paths {
            let path = Path::new(raw_path);

            if !head_snapshot.contains_key(path) && !index.staged().contains_key(path) {
                return Err(RepoError::NotFound(format!("tracked file '{}'", raw_path)).into());
            }

            index.mark_removed(path.to_path_buf());

            let absolute_path = self.workspace().path().join(path);
            if absolute_path.is_file() {
                std::fs::remove_file(&absolute_path)?;
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
