use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use output directory {}: {reason}", .path.display())]
    OutputDir { path: PathBuf, reason: String },
    #[error("{0:?} is not a plain file name")]
    FileName(String),
    #[error("writing artifact failed: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` (and parents) unless it already exists as a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))?;
    if !dir.is_dir() {
        return Err(unusable("not a directory".to_string()));
    }
    Ok(())
}

/// Generated CSV and ZIP files, saved under one output directory.
///
/// Content goes to a temp file in the same directory and is renamed over the
/// target, so readers see either the old artifact or the complete new one.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `content` as `file_name`, replacing an earlier artifact of that name.
    pub fn save(&self, file_name: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        if !is_plain_file_name(file_name) {
            return Err(PersistError::FileName(file_name.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_ref())?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(file_name);
        staged.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && matches!(Path::new(name).components().next(), Some(Component::Normal(_)))
}
