use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Throw-away browser user-data directory, removed on drop
pub struct ProfileManager {
    path: PathBuf,
}

impl ProfileManager {
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("quizchain-profile-")
            .tempdir()
            .map_err(Error::Io)?;

        Ok(Self {
            path: temp_dir.keep(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
