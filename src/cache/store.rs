//! Directory store - one file per unit inside a library directory

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::MARKER_FILE;
use crate::core::error::{LibError, Result};
use crate::core::ident::Ident;
use crate::core::paths::{is_hidden, is_plain_file_name, marker_path};
use crate::unit::frame::{FrameReader, FrameWriter};
use crate::unit::Unit;

/// How a file inside the store is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// Outcome of deleting a store from disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyReport {
    pub removed: usize,
    pub failures: usize,
}

/// Filesystem-keyed store: a unit key maps to `<root>/<key>`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a fresh library directory at `path` and tag it with a marker.
    pub fn create(path: &Path, marker_tag: &str) -> Result<Self> {
        if path.exists() {
            return Err(LibError::AlreadyExists(path.to_path_buf()));
        }

        fs::create_dir(path).map_err(|source| LibError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::open(path.to_path_buf());
        store.write_marker(marker_tag)?;
        Ok(store)
    }

    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `name` directly inside the store. Anything that would resolve
    /// elsewhere (separators, `.`, `..`, absolute paths) is rejected.
    pub fn file_path(&self, name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(name) {
            return Err(LibError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    pub fn unit_path(&self, ident: &Ident) -> Result<PathBuf> {
        self.file_path(ident.as_str())
    }

    pub fn open_file(&self, name: &str, mode: OpenMode) -> Result<File> {
        let path = self.file_path(name)?;
        let file = match mode {
            OpenMode::Read => File::open(&path),
            OpenMode::Write => File::create(&path),
        };
        file.map_err(|source| LibError::io(path, source))
    }

    fn write_marker(&self, tag: &str) -> Result<()> {
        let mut file = self.open_file(MARKER_FILE, OpenMode::Write)?;
        writeln!(file, "{}", tag).map_err(|source| LibError::io(marker_path(&self.root), source))
    }

    /// Raw names of every entry in the directory, sorted.
    ///
    /// Failing to list the directory means the store itself is gone.
    fn raw_entries(&self) -> Result<Vec<OsString>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        walker
            .into_iter()
            .map(|entry| {
                entry
                    .map(|entry| entry.file_name().to_os_string())
                    .map_err(|e| LibError::StoreUnavailable {
                        path: self.root.clone(),
                        source: e.into(),
                    })
            })
            .collect()
    }

    /// Names of every entry that can be a unit key, sorted. Entries whose
    /// name is not valid UTF-8 are skipped.
    pub fn entry_names(&self) -> Result<Vec<String>> {
        Ok(self
            .raw_entries()?
            .into_iter()
            .filter_map(|name| name.into_string().ok())
            .collect())
    }

    /// Read the unit stored under `ident`, if a file with exactly that name
    /// exists in the directory.
    pub fn read_unit<U: Unit>(&self, ident: &Ident) -> Result<Option<U>> {
        let key = ident.as_str();
        if !self.entry_names()?.iter().any(|name| name == key) {
            return Ok(None);
        }

        let path = self.unit_path(ident)?;
        let file = self.open_file(key, OpenMode::Read)?;
        let codec = |source| LibError::Codec {
            path: path.clone(),
            source,
        };

        let mut reader = FrameReader::begin(file).map_err(codec)?;
        let unit = reader.read::<U>().map_err(codec)?;
        reader.end();

        tracing::debug!("loaded unit {} from {}", ident, path.display());
        Ok(Some(unit))
    }

    /// Write `unit` to its file, replacing any previous contents.
    pub fn write_unit<U: Unit>(&self, unit: &U) -> Result<()> {
        let ident = unit.ident();
        let path = self.unit_path(&ident)?;
        let file = self.open_file(ident.as_str(), OpenMode::Write)?;
        let codec = |source| LibError::Codec {
            path: path.clone(),
            source,
        };

        let mut writer = FrameWriter::begin(file).map_err(codec)?;
        writer.write(unit).map_err(codec)?;
        writer.end().map_err(codec)?;
        Ok(())
    }

    /// Delete every non-hidden entry and then the directory itself.
    ///
    /// Failures are logged and counted, never returned.
    pub fn remove_all(self) -> DestroyReport {
        let mut report = DestroyReport::default();

        let names = match self.raw_entries() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("{}", e);
                report.failures += 1;
                return report;
            }
        };

        for name in names.iter().filter(|name| !is_hidden(name)) {
            let path = self.root.join(name);
            match fs::remove_file(&path) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    tracing::warn!("failed to remove {}: {}", path.display(), e);
                    report.failures += 1;
                }
            }
        }

        if let Err(e) = fs::remove_dir(&self.root) {
            tracing::warn!("failed to remove {}: {}", self.root.display(), e);
            report.failures += 1;
        }

        report
    }
}
