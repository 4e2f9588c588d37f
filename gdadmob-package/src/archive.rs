//! Archive building, reading and content hashing.

use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};
use std::path::Path;

use gdadmob_template::FileSet;
use sha2::{Digest, Sha256};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{PackageError, PackageResult};

/// A single file entry inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Collects entries from several sources and writes one zip.
///
/// The first entry added under a name wins; later duplicates are dropped.
/// Entries are written sorted by name with a fixed timestamp and mode, so
/// the same inputs always produce the same bytes.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: BTreeMap<String, Vec<u8>>,
    duplicates: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Returns `false` when the name was already present.
    pub fn add_file(&mut self, name: impl Into<String>, data: Vec<u8>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            debug!(entry = %name, "Excluding duplicate archive entry");
            self.duplicates += 1;
            return false;
        }
        self.entries.insert(name, data);
        true
    }

    /// Adds every file of `files`, each named `<prefix>/<relative path>`.
    /// Returns the number of entries added.
    pub fn add_tree(&mut self, files: &FileSet, prefix: &str) -> PackageResult<usize> {
        let mut added = 0;
        for file in files.files()? {
            let data = std::fs::read(&file.path).map_err(|source| PackageError::Io {
                path: file.path.clone(),
                source,
            })?;
            if self.add_file(entry_name(prefix, &file.relative), data) {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped by the duplicate policy.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Builds the zip archive and returns the raw bytes.
    pub fn build(&self) -> PackageResult<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        let finished = zip.finish()?;
        Ok(finished.into_inner())
    }

    /// Builds the archive and writes it to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> PackageResult<u64> {
        let bytes = self.build()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PackageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, &bytes).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(bytes.len() as u64)
    }
}

/// An opened archive with its file entries.
#[derive(Debug, Clone)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Opens and reads every file entry of a zip.
    pub fn open<R: Read + Seek>(reader: R) -> PackageResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(ArchiveEntry { name, data });
        }

        Ok(Self { entries })
    }

    pub fn open_path(path: &Path) -> PackageResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::open(std::io::BufReader::new(file))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Returns the entry, or [`PackageError::MissingEntry`].
    pub fn require(&self, name: &str) -> PackageResult<&[u8]> {
        self.get(name)
            .ok_or_else(|| PackageError::MissingEntry(name.to_string()))
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Computes a deterministic SHA-256 content hash over all entries.
    /// Entries are sorted by name to ensure determinism.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in sorted {
            hasher.update(entry.name.as_bytes());
            hasher.update((entry.data.len() as u64).to_le_bytes());
            hasher.update(&entry.data);
        }

        hex::encode(hasher.finalize())
    }
}

/// `<prefix>/<relative>` with `/` separators and no leading slash.
pub fn entry_name(prefix: &str, relative: &Path) -> String {
    let rel = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        rel
    } else {
        format!("{prefix}/{rel}")
    }
}
