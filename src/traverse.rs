//! Deterministic directory walks with separate directory and file callbacks.
//!
//! Both walks skip the root itself, never enter `.git`, and treat a missing
//! root as an empty tree. Siblings are visited in file-name order.
use crate::errors::{FileOperation, IoError};
use std::path::Path;
use walkdir::WalkDir;

const GIT_DIR: &str = ".git";

fn walk(root: &Path, contents_first: bool) -> walkdir::IntoIter {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .contents_first(contents_first)
        .into_iter()
}

fn walk_error(root: &Path, error: walkdir::Error) -> IoError {
    let path = error.path().unwrap_or(root).to_path_buf();

    IoError::new(FileOperation::Read, path, error.into())
}

fn is_inside_git(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .map(|relative| relative.components().any(|c| c.as_os_str() == GIT_DIR))
        .unwrap_or(false)
}

/// Visits every directory before its children.
///
/// If `on_dir` removes the directory it was handed, its children are not visited.
pub fn pre_order<E, D, F>(root: &Path, mut on_dir: D, mut on_file: F) -> Result<(), E>
where
    E: From<IoError>,
    D: FnMut(&Path) -> Result<(), E>,
    F: FnMut(&Path) -> Result<(), E>,
{
    if !root.exists() {
        log::debug!("nothing to traverse at {}", root.display());
        return Ok(());
    }

    let mut entries = walk(root, false);

    while let Some(entry) = entries.next() {
        let entry = entry.map_err(|error| walk_error(root, error))?;

        if entry.file_name() == GIT_DIR {
            if entry.file_type().is_dir() {
                entries.skip_current_dir();
            }
            continue;
        }

        let path = entry.path();

        if entry.file_type().is_dir() {
            on_dir(path)?;

            if !path.exists() {
                entries.skip_current_dir();
            }
        } else {
            on_file(path)?;
        }
    }

    Ok(())
}

/// Visits every directory after all of its children, which makes it safe for
/// recursive removal.
pub fn post_order<E, D, F>(root: &Path, mut on_dir: D, mut on_file: F) -> Result<(), E>
where
    E: From<IoError>,
    D: FnMut(&Path) -> Result<(), E>,
    F: FnMut(&Path) -> Result<(), E>,
{
    if !root.exists() {
        log::debug!("nothing to traverse at {}", root.display());
        return Ok(());
    }

    for entry in walk(root, true) {
        let entry = entry.map_err(|error| walk_error(root, error))?;
        let path = entry.path();

        if is_inside_git(root, path) {
            continue;
        }

        if entry.file_type().is_dir() {
            on_dir(path)?;
        } else {
            on_file(path)?;
        }
    }

    Ok(())
}
