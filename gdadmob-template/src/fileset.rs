//! Declarative file selection: a root directory plus include/exclude globs.
//!
//! Patterns are matched against the `/`-separated path relative to the root,
//! with `*` confined to one path component and `**/` matching zero or more
//! directories, the same way Gradle file trees behave.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file selected by a [`FileSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the set's root.
    pub relative: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileSet {
    root: PathBuf,
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl FileSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Adds an include pattern. With no includes every file is selected.
    pub fn include(mut self, pattern: &str) -> TemplateResult<Self> {
        self.includes.push(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn exclude(mut self, pattern: &str) -> TemplateResult<Self> {
        self.excludes.push(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Whether a root-relative path is selected by the patterns.
    pub fn matches(&self, relative: &Path) -> bool {
        let rel = to_slash(relative);
        let included =
            self.includes.is_empty() || self.includes.iter().any(|p| pattern_matches(p, &rel));
        included && !self.excludes.iter().any(|p| pattern_matches(p, &rel))
    }

    /// Selected regular files, sorted by relative path.
    ///
    /// A missing root is reported as [`TemplateError::NotFound`]; callers
    /// treating the input as optional check [`FileSet::root_exists`] first.
    pub fn files(&self) -> TemplateResult<Vec<FileEntry>> {
        if !self.root_exists() {
            return Err(TemplateError::NotFound(self.root.clone()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            if self.matches(&relative) {
                entries.push(FileEntry {
                    path: entry.path().to_path_buf(),
                    relative,
                });
            }
        }
        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}

fn pattern_matches(pattern: &Pattern, relative: &str) -> bool {
    if pattern.matches_with(relative, MATCH_OPTIONS) {
        return true;
    }
    // `**/x` also selects `x` at the root.
    pattern
        .as_str()
        .strip_prefix("**/")
        .and_then(|rest| Pattern::new(rest).ok())
        .is_some_and(|rest| rest.matches_with(relative, MATCH_OPTIONS))
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
