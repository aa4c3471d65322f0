//! File system utilities for pipeline steps.
//!
//! Provides idempotent removal, parent-creating writes and the additive
//! tree copy used for deployment.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Writes `contents` to `path`, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, contents).await.fs_context("writing", path)
}

/// Removes a file or a whole directory tree.
///
/// Returns `false` when nothing existed at `path`.
pub async fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).fs_context("inspecting", path),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match removed {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false), // Idempotent
        Err(e) => Err(e).fs_context("deleting", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}

/// Recursively copies the contents of `from` into `to`.
///
/// Existing files at the same relative path are overwritten; anything else
/// already under `to` is left alone. Returns the number of files copied.
pub async fn copy_dir_contents(from: &Path, to: &Path) -> Result<usize> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&to).fs_context("creating directory", &to)?;

        let mut copied = 0;
        for entry in walkdir::WalkDir::new(&from).min_depth(1) {
            let entry = entry?;
            let dest_path = to.join(relative_to(&from, entry.path())?);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
                }
                std::fs::copy(entry.path(), &dest_path).fs_context("copying to", &dest_path)?;
                copied += 1;
            }
        }

        Ok(copied)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Lists regular files under `dir` with their sizes, sorted by relative path.
pub async fn list_files(dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                let size = entry
                    .metadata()
                    .map_err(Error::Walk)?
                    .len();
                files.push((relative_to(&dir, entry.path())?, size));
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory listing task panicked: {}", e)))?
}

/// Strips `base` from `path`.
pub(crate) fn relative_to(base: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|e| Error::GenericError(format!("{}: {}", path.display(), e)))
}
