//! Atomic file replacement.
//!
//! Output is written to a file inside a randomized directory next to the
//! target and renamed onto the target only on [`AtomicFile::commit`], so the
//! target is never seen partially written. Dropping an uncommitted
//! [`AtomicFile`] removes the staging directory and everything in it, along
//! with any parent directories [`AtomicFile::stage`] had to create.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{OutputError, Result};

const STAGING_PREFIX: &str = ".tabload-";

/// A staged replacement for one target file.
#[derive(Debug)]
pub struct AtomicFile {
    target: PathBuf,
    temp_path: PathBuf,
    // Field order matters: the staging directory is removed before the
    // directories that contain it.
    staging: TempDir,
    created: Option<CreatedDirs>,
}

/// Parent directories created for a staged write, from `top` down to `leaf`.
///
/// Removed again on drop unless [`keep`](Self::keep) was called. Only empty
/// directories are removed.
#[derive(Debug)]
struct CreatedDirs {
    top: PathBuf,
    leaf: PathBuf,
    keep: bool,
}

impl CreatedDirs {
    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for CreatedDirs {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        let mut dir = self.leaf.as_path();
        loop {
            if let Err(e) = fs::remove_dir(dir)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                debug!(path = %dir.display(), error = %e, "left created directory in place");
                return;
            }
            if dir == self.top {
                return;
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return,
            }
        }
    }
}

impl AtomicFile {
    /// Prepares to replace `target`.
    ///
    /// Missing parent directories are created, provided the nearest existing
    /// ancestor is a writable directory. Nothing is written yet: callers fill
    /// [`path`](Self::path) (see [`create`](Self::create)) and then commit.
    pub fn stage(target: &Path) -> Result<Self> {
        let target = std::path::absolute(target).map_err(|e| OutputError::Io {
            operation: "resolve",
            path: target.to_path_buf(),
            source: e,
        })?;
        let file_name = target
            .file_name()
            .ok_or_else(|| OutputError::InvalidTarget {
                path: target.clone(),
                reason: "path has no file name".to_string(),
            })?
            .to_owned();
        if target.is_dir() {
            return Err(OutputError::InvalidTarget {
                path: target,
                reason: "path is a directory".to_string(),
            });
        }
        let parent = target
            .parent()
            .ok_or_else(|| OutputError::InvalidTarget {
                path: target.clone(),
                reason: "path has no parent directory".to_string(),
            })?
            .to_path_buf();

        let ancestor = writable_ancestor(&target, &parent)?;
        let created = parent
            .ancestors()
            .find(|dir| dir.parent() == Some(ancestor.as_path()))
            .filter(|_| ancestor != parent)
            .map(|top| CreatedDirs {
                top: top.to_path_buf(),
                leaf: parent.clone(),
                keep: false,
            });
        fs::create_dir_all(&parent).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: parent.clone(),
            source: e,
        })?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| OutputError::Io {
                operation: "create staging directory in",
                path: parent.clone(),
                source: e,
            })?;
        let temp_path = staging.path().join(file_name);
        debug!(
            target = %target.display(),
            temp = %temp_path.display(),
            "staged atomic write"
        );
        Ok(Self {
            target,
            temp_path,
            staging,
            created,
        })
    }

    /// Path of the staged file. It does not exist until written.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Absolute path the staged file will be moved to.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Creates (or truncates) the staged file for writing.
    pub fn create(&self) -> Result<File> {
        File::create(&self.temp_path).map_err(|e| OutputError::Io {
            operation: "create",
            path: self.temp_path.clone(),
            source: e,
        })
    }

    /// Moves the staged file onto the target.
    pub fn commit(self) -> Result<()> {
        if !self.temp_path.is_file() {
            return Err(OutputError::TempFileMissing {
                temp_path: self.temp_path.clone(),
                target_path: self.target.clone(),
            });
        }
        fs::rename(&self.temp_path, &self.target).map_err(|e| {
            OutputError::AtomicWriteFailed {
                temp_path: self.temp_path.clone(),
                target_path: self.target.clone(),
                source: e,
            }
        })?;
        info!("Saved {}", self.target.display());
        if let Some(created) = self.created {
            created.keep();
        }

        // The target is in place; a leftover empty directory is only noise.
        let staging_path = self.staging.path().to_path_buf();
        if let Err(e) = self.staging.close() {
            warn!(
                path = %staging_path.display(),
                error = %e,
                "failed to remove staging directory"
            );
        }
        Ok(())
    }

    /// Drops the staged output, leaving the target untouched. Parent
    /// directories created by [`stage`](Self::stage) are removed too.
    pub fn discard(self) -> Result<()> {
        let staging_path = self.staging.path().to_path_buf();
        self.staging.close().map_err(|e| OutputError::Io {
            operation: "remove",
            path: staging_path,
            source: e,
        })
    }
}

/// Writes `bytes` to `target` through an [`AtomicFile`].
pub fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let staged = AtomicFile::stage(target)?;
    let mut file = staged.create()?;
    file.write_all(bytes).map_err(|e| OutputError::Io {
        operation: "write",
        path: staged.path().to_path_buf(),
        source: e,
    })?;
    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: staged.path().to_path_buf(),
        source: e,
    })?;
    drop(file);
    staged.commit()
}

/// Nearest existing ancestor of `parent`, which must be a writable directory.
fn writable_ancestor(target: &Path, parent: &Path) -> Result<PathBuf> {
    let mut ancestor = parent;
    while !ancestor.exists() {
        ancestor = ancestor.parent().ok_or_else(|| OutputError::InvalidTarget {
            path: target.to_path_buf(),
            reason: "no ancestor directory exists".to_string(),
        })?;
    }
    let metadata = fs::metadata(ancestor).map_err(|e| OutputError::Io {
        operation: "inspect",
        path: ancestor.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() || metadata.permissions().readonly() {
        return Err(OutputError::NotWritable {
            path: target.to_path_buf(),
            ancestor: ancestor.to_path_buf(),
        });
    }
    Ok(ancestor.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_staged_file_is_sibling_of_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.csv");

        let staged = AtomicFile::stage(&target).unwrap();

        let staging_dir = staged.path().parent().unwrap();
        assert_eq!(staging_dir.parent().unwrap(), dir.path());
        assert!(
            staging_dir
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(STAGING_PREFIX)
        );
        assert_eq!(staged.path().file_name(), target.file_name());
        assert!(!staged.path().exists());
    }

    #[test]
    fn test_relative_target_is_absolutized() {
        let staged = AtomicFile::stage(Path::new("relative-output.csv")).unwrap();
        assert!(staged.target().is_absolute());
        staged.discard().unwrap();
    }

    #[test]
    fn test_ancestor_that_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = AtomicFile::stage(&blocker.join("nested").join("out.csv")).unwrap_err();

        assert!(matches!(err, OutputError::NotWritable { .. }));
    }

    #[test]
    fn test_directory_target_rejected() {
        let dir = tempdir().unwrap();
        let err = AtomicFile::stage(dir.path()).unwrap_err();
        assert!(matches!(err, OutputError::InvalidTarget { .. }));
    }
}
