//! File system helpers for writing outputs.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Prefix of temporary files created next to outputs.
pub(crate) const TEMP_PREFIX: &str = ".md2pdf-";

/// Returns the directory `path` is written into, `.` for bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Lexically resolves `.` and `..` components of an absolute path.
pub(crate) fn normalize_absolute(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Checks whether `a` and `b` name the same file.
///
/// Existing files are compared after resolving symlinks, anything else by
/// its normalized absolute path.
///
/// # Arguments
///
/// * `a` - First path, relative to the current directory or absolute
/// * `b` - Second path, relative to the current directory or absolute
///
/// # Returns
///
/// `true` if both paths resolve to the same location
pub fn same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }

    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => normalize_absolute(&a) == normalize_absolute(&b),
        _ => false,
    }
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so `path` is either fully written or left untouched.
///
/// # Arguments
///
/// * `path` - Destination file; missing parent directories are created
/// * `contents` - Bytes to write
///
/// # Errors
///
/// Returns `Write` if the temporary file cannot be created, written or
/// moved into place
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|e| ConvertError::write(&dir, e))?;

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(&dir)
        .map_err(|e| ConvertError::write(path, e))?;

    file.write_all(contents)
        .and_then(|_| file.flush())
        .map_err(|e| ConvertError::write(path, e))?;

    file.persist(path)
        .map_err(|e| ConvertError::write(path, e.error))?;

    Ok(())
}

/// Files and directories a conversion created, removed again when the
/// conversion fails.
///
/// Only paths that did not exist beforehand are recorded, so a failed run
/// never deletes anything it found on disk.
#[derive(Debug, Default)]
pub(crate) struct CreatedPaths {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl CreatedPaths {
    /// Creates `dir` and its missing ancestors.
    pub(crate) fn create_dir_all(&mut self, dir: &Path) -> Result<()> {
        let mut missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
            .map(Path::to_path_buf)
            .collect();

        fs::create_dir_all(dir).map_err(|e| ConvertError::write(dir, e))?;

        // Outermost first, so rollback removes children before parents.
        missing.reverse();
        self.dirs.extend(missing);
        Ok(())
    }

    /// Copies `source` to `destination`, creating parent directories.
    pub(crate) fn copy(&mut self, source: &Path, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            self.create_dir_all(parent)?;
        }

        let existed = destination.exists();
        fs::copy(source, destination).map_err(|e| ConvertError::write(destination, e))?;
        if !existed {
            self.files.push(destination.to_path_buf());
        }
        Ok(())
    }

    /// Writes `contents` to `path` with [`write_atomic`].
    pub(crate) fn write(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        self.create_dir_all(&parent_dir(path))?;

        let existed = path.exists();
        write_atomic(path, contents)?;
        if !existed {
            self.files.push(path.to_path_buf());
        }
        Ok(())
    }

    /// Returns `result` unchanged, first removing everything recorded when
    /// it is an error.
    pub(crate) fn settle<T>(self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.rollback();
        }
        result
    }

    fn rollback(self) {
        for file in self.files.iter().rev() {
            if let Err(e) = fs::remove_file(file) {
                log::debug!("Could not remove {}: {}", file.display(), e);
            }
        }
        for dir in self.dirs.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                log::debug!("Could not remove {}: {}", dir.display(), e);
            }
        }
    }
}
