//! Declarative copy and delete operations over file sets.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use gdadmob_template::FileSet;
use tracing::debug;

use crate::error::{AssemblerError, AssemblerResult};

/// How a selected file's relative path maps into the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRemap {
    /// Keep the relative path.
    Keep,
    /// Keep only the file name.
    FileName,
    /// Drop the leading directories above the first component ending with
    /// the suffix, e.g. `debug/AdmobPlugin.xcframework/Info.plist` becomes
    /// `AdmobPlugin.xcframework/Info.plist` for `.xcframework`. Files
    /// without such a component are not copied.
    FromSuffix(String),
}

impl PathRemap {
    /// Destination-relative path, or `None` when the file is dropped.
    pub fn apply(&self, relative: &Path) -> Option<PathBuf> {
        match self {
            PathRemap::Keep => Some(relative.to_path_buf()),
            PathRemap::FileName => relative.file_name().map(PathBuf::from),
            PathRemap::FromSuffix(suffix) => {
                let components: Vec<Component<'_>> = relative.components().collect();
                components
                    .iter()
                    .position(|c| c.as_os_str().to_string_lossy().ends_with(suffix.as_str()))
                    .map(|i| components[i..].iter().collect())
            }
        }
    }
}

/// Copies a file set into a destination directory.
#[derive(Debug, Clone)]
pub struct CopySpec {
    pub files: FileSet,
    pub into: PathBuf,
    pub remap: PathRemap,
}

impl CopySpec {
    pub fn new(files: FileSet, into: impl Into<PathBuf>) -> Self {
        Self {
            files,
            into: into.into(),
            remap: PathRemap::Keep,
        }
    }

    pub fn remap(mut self, remap: PathRemap) -> Self {
        self.remap = remap;
        self
    }

    /// Copies every selected file and returns the written paths.
    pub fn copy(&self) -> AssemblerResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for entry in self.files.files()? {
            let Some(mapped) = self.remap.apply(&entry.relative) else {
                continue;
            };
            let dest = self.into.join(mapped);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).map_err(|e| AssemblerError::io(parent, e))?;
            }
            std::fs::copy(&entry.path, &dest).map_err(|e| AssemblerError::io(&entry.path, e))?;
            debug!(from = %entry.path.display(), to = %dest.display(), "Copied file");
            written.push(dest);
        }
        Ok(written)
    }
}

/// Deletes the files of a set, keeping the root directory.
///
/// Excluded files survive, and so do the directories that still hold them.
/// A directory is removed only when this clean emptied it; directories that
/// were already empty stay.
#[derive(Debug, Clone)]
pub struct CleanSpec {
    pub files: FileSet,
}

impl CleanSpec {
    pub fn new(files: FileSet) -> Self {
        Self { files }
    }

    /// Deletes matching files and returns how many were removed. A missing
    /// root is already clean.
    pub fn run(&self) -> AssemblerResult<usize> {
        if !self.files.root_exists() {
            return Ok(0);
        }
        let mut removed = 0;
        let mut emptied = BTreeSet::new();
        for entry in self.files.files()? {
            std::fs::remove_file(&entry.path).map_err(|e| AssemblerError::io(&entry.path, e))?;
            if let Some(parent) = entry.path.parent() {
                emptied.insert(parent.to_path_buf());
            }
            removed += 1;
        }
        prune_emptied_dirs(self.files.root(), emptied)?;
        Ok(removed)
    }
}

/// Removes the candidate directories that are now empty, and any ancestor
/// below `root` left empty by that, deepest first. `root` itself stays.
fn prune_emptied_dirs(root: &Path, candidates: BTreeSet<PathBuf>) -> AssemblerResult<()> {
    for dir in candidates.into_iter().rev() {
        let mut current = dir.as_path();
        while current != root && current.starts_with(root) && is_empty_dir(current)? {
            std::fs::remove_dir(current).map_err(|e| AssemblerError::io(current, e))?;
            debug!(dir = %current.display(), "Removed emptied directory");
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
    Ok(())
}

fn is_empty_dir(path: &Path) -> AssemblerResult<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(std::fs::read_dir(path)
        .map_err(|e| AssemblerError::io(path, e))?
        .next()
        .is_none())
}

/// Removes a directory tree if it exists.
pub fn remove_tree(path: &Path) -> AssemblerResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path).map_err(|e| AssemblerError::io(path, e))?;
    Ok(true)
}
