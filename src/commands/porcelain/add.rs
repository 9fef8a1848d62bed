use crate::areas::repository::Repository;
use crate::error::RepoError;
use std::path::{Component, Path, PathBuf};

impl Repository {
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        for raw_path in paths {
            validate_relative_path(raw_path)?;

            // normalize away any leading `./` so staged paths match the
            // workspace listing
            let path = Path::new(raw_path)
                .components()
                .filter(|component| matches!(component, Component::Normal(_)))
                .collect::<PathBuf>();

            if !self.workspace().is_regular_file(&path) {
                return Err(RepoError::NotFound(format!("file '{}'", raw_path)).into());
            }

            let blob = self.workspace().parse_blob(&path)?;
            let blob_oid = self.database().store(&blob)?;

            index.stage(path, blob_oid);
        }

        index.write_updates()?;

        Ok(())
    }
}

/// Tracked paths must stay inside the working tree and round-trip through
/// the commit format, which splits snapshot lines on the first space.
fn validate_relative_path(raw_path: &str) -> anyhow::Result<()> {
    if raw_path.chars().any(char::is_whitespace) {
        return Err(RepoError::InvalidPath(raw_path.to_string()).into());
    }

    let escapes_workdir = Path::new(raw_path)
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if escapes_workdir {
        return Err(RepoError::InvalidPath(raw_path.to_string()).into());
    }

    Ok(())
}
